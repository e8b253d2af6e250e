//! Stdio IPC transport layer.
//!
//! Newline-delimited JSON-RPC 2.0, the stdio transport of the Model Context
//! Protocol. The host launches this process and exchanges `initialize`,
//! `tools/list` and `tools/call` messages over stdin/stdout.

pub mod codec;
pub mod server;

pub use server::McpServer;
