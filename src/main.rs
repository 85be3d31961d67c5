//! MCP server entry point.
//!
//! Loads configuration, initializes logging, builds the operation registry
//! and serves it on the configured transport.

use anyhow::{Context, Result};
use tracing::{Level, info};

use toolbox_mcp_server::core::{
    Config, McpServer, TransportService,
    logging::{init_logging, parse_level},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(
        parse_level(&config.logging.level, Level::INFO),
        config.logging.with_timestamps,
    );

    info!("Starting {} v{}", config.server.name, config.server.version);

    // A malformed namespace is a programming error; refuse to start.
    let server = McpServer::new(config.clone()).context("Failed to build the tool registry")?;

    TransportService::new(config.transport)
        .run(server)
        .await
        .context("Transport failed")?;

    info!("Server shutting down");

    Ok(())
}
