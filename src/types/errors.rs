//! Tool error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. The five
//! taxonomy variants are the categories a host ever sees; everything else is
//! folded into `InternalError` by the dispatcher.

use serde::Serialize;
use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Outbound error category reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    UnknownTool,
    InvalidArgument,
    NotFound,
    NetworkError,
    InternalError,
}

impl ErrorCategory {
    /// Stable string code, used in logs and in the `data` of protocol errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::UnknownTool => "UNKNOWN_TOOL",
            ErrorCategory::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCategory::NotFound => "NOT_FOUND",
            ErrorCategory::NetworkError => "NETWORK_ERROR",
            ErrorCategory::InternalError => "INTERNAL_ERROR",
        }
    }

    /// JSON-RPC error code for this category.
    pub fn jsonrpc_code(&self) -> i64 {
        match self {
            ErrorCategory::UnknownTool => -32601,
            ErrorCategory::InvalidArgument => -32602,
            ErrorCategory::NotFound => -32600,
            ErrorCategory::NetworkError => -32000,
            ErrorCategory::InternalError => -32603,
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error enum for the tool server.
#[derive(Error, Debug)]
pub enum Error {
    /// No tool registered under the requested name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Missing or malformed input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote service reports the resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport-level failure reaching the remote service.
    #[error("network error: {message}")]
    Network {
        message: String,
        status: Option<u16>,
    },

    /// Anything else, wrapping the original cause's message.
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Category for taxonomy variants; `None` for causes the dispatcher must wrap.
    pub fn recognized_category(&self) -> Option<ErrorCategory> {
        match self {
            Error::UnknownTool(_) => Some(ErrorCategory::UnknownTool),
            Error::InvalidArgument(_) => Some(ErrorCategory::InvalidArgument),
            Error::NotFound(_) => Some(ErrorCategory::NotFound),
            Error::Network { .. } => Some(ErrorCategory::NetworkError),
            Error::Internal(_) => Some(ErrorCategory::InternalError),
            Error::Serialization(_) | Error::Io(_) => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.recognized_category()
            .unwrap_or(ErrorCategory::InternalError)
    }

    /// Human-readable message without the category prefix.
    pub fn message(&self) -> String {
        match self {
            Error::UnknownTool(msg)
            | Error::InvalidArgument(msg)
            | Error::NotFound(msg)
            | Error::Internal(msg) => msg.clone(),
            Error::Network { message, .. } => message.clone(),
            Error::Serialization(e) => format!("serialization error: {}", e),
            Error::Io(e) => format!("io error: {}", e),
        }
    }

    /// Remote HTTP status, when the failure came with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Network { status, .. } => *status,
            _ => None,
        }
    }
}

// Convenience constructors
impl Error {
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn network(msg: impl Into<String>, status: Option<u16>) -> Self {
        Self::Network {
            message: msg.into(),
            status,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
