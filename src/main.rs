//! OpenFoodFacts MCP server - main entry point.
//!
//! Runs the tool server over stdio. Configure it in an MCP host, e.g.:
//!
//! ```json
//! { "mcpServers": { "openfoodfacts": { "command": "openfoodfacts-mcp" } } }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use openfoodfacts_mcp::{Config, Dispatcher, McpServer};

/// Open Food Facts tools for MCP hosts, served on stdin/stdout.
#[derive(Debug, Parser)]
#[command(name = "openfoodfacts-mcp", version, about)]
struct Cli {
    /// JSON config file.
    #[arg(long, env = "OPENFOODFACTS_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the Open Food Facts origin.
    #[arg(long, env = "OPENFOODFACTS_BASE_URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "OPENFOODFACTS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(log_level) = cli.log_level {
        config.observability.log_level = log_level;
    }
    config.observability.json_logs |= cli.json_logs;

    // Initialize observability (stderr only)
    openfoodfacts_mcp::observability::init_tracing(&config.observability);

    let dispatcher = Dispatcher::from_config(&config.api)?;
    tracing::info!("Open Food Facts API at {}", config.api.base_url);

    let server = Arc::new(McpServer::new(dispatcher, config.server.clone()));
    {
        let server = Arc::clone(&server);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                server.shutdown();
            }
        });
    }

    match server.serve_stdio().await {
        Ok(()) => {
            tracing::info!("Server stopped");
            std::process::exit(0)
        }
        Err(e) => {
            tracing::error!("Server failed: {}", e);
            Err(e.into())
        }
    }
}
