//! mcp-fetch server entry point.
//!
//! Boots the MCP server on the configured transport. Logging goes to stderr so
//! stdout stays reserved for JSON-RPC when running on stdio.

use anyhow::Result;
use fetchmcp_core::{AppConfig, Transport};
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;
mod transport;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        user_agent = %config.user_agent,
        respect_robots = config.respect_robots,
        proxy = config.proxy_url.is_some(),
        transport = ?config.transport,
        "configuration loaded"
    );

    let handler = handler::FetchServer::new(&config);
    match config.transport {
        Transport::Stdio => transport::serve_stdio(handler).await,
        Transport::Http => transport::serve_http(handler, &config).await,
    }
}
