//! Configuration structures.
//!
//! Configuration is loaded from an optional JSON file and then overridden by
//! command-line flags and environment variables in the binary.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::errors::{Error, Result};

/// Public Open Food Facts origin.
pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";

/// Global server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Protocol server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from a JSON file. Missing sections take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            Error::invalid_argument(format!("Invalid config file {}: {}", path.display(), e))
        })
    }
}

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin every request path is appended to.
    pub base_url: String,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Per-request timeout. `None` leaves the transport default in place.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("openfoodfacts-mcp/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout: None,
        }
    }
}

/// Protocol server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name advertised in `serverInfo`.
    pub name: String,

    /// Version advertised in `serverInfo`.
    pub version: String,

    /// Maximum accepted size of one inbound message line.
    pub max_message_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "openfoodfacts-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            max_message_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
