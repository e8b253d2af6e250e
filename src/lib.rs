//! # OpenFoodFacts MCP - food product tools over stdio
//!
//! Exposes the public Open Food Facts database as a set of callable tools:
//! product search, barcode lookup, category and brand listings, nutrition
//! facts, allergen info, multi-product comparison and nutrient-threshold
//! search.
//!
//! ## Architecture
//!
//! Every call is stateless; the only long-lived state is the read-only tool
//! catalog and the HTTP client:
//! ```text
//!   stdin  →  ipc::server  →  Dispatcher  →  handlers  →  OpenFoodFactsClient  →  HTTP
//!   stdout ←  ipc::server  ←  ResultEnvelope ← format  ←────────────┘
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod client;
pub mod dispatch;
pub mod envelope;
pub mod format;
pub mod handlers;
pub mod ipc;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use client::{OpenFoodFactsClient, QueryParams};
pub use dispatch::{Dispatcher, ToolInvocation, ToolName};
pub use envelope::{Content, ResultEnvelope};
pub use ipc::McpServer;
pub use tools::ToolCatalog;
pub use types::{Config, Error, ErrorCategory, Result};
