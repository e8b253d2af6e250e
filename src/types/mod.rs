//! Core types for the tool server.
//!
//! - **Errors**: the tool error taxonomy with thiserror derives
//! - **Config**: remote API, protocol server and observability settings

mod config;
mod errors;

pub use config::{ApiConfig, Config, ObservabilityConfig, ServerConfig, DEFAULT_BASE_URL};
pub use errors::{Error, ErrorCategory, Result};
