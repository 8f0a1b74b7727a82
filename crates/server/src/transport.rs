//! Transports the server can be reached on.
//!
//! `stdio` serves a single client over stdin/stdout. `http` serves any number
//! of clients over MCP streamable HTTP at `/mcp`, each session getting a clone
//! of the same [`FetchServer`] and therefore the same pipeline.

use anyhow::{Context, Result};
use fetchmcp_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};

use crate::handler::FetchServer;

/// Path the HTTP transport is mounted on.
pub const MCP_PATH: &str = "/mcp";

pub async fn serve_stdio(handler: FetchServer) -> Result<()> {
    tracing::info!("Starting mcp-fetch server on stdio transport");
    let server = serve_server(handler, stdio()).await?;
    server.waiting().await?;
    Ok(())
}

/// Router exposing `handler` over streamable HTTP.
pub fn http_router(handler: FetchServer) -> axum::Router {
    let service: StreamableHttpService<FetchServer, LocalSessionManager> = StreamableHttpService::new(
        move || Ok(handler.clone()),
        Default::default(),
        StreamableHttpServerConfig::default(),
    );
    axum::Router::new().nest_service(MCP_PATH, service)
}

pub async fn serve_http(handler: FetchServer, config: &AppConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, path = MCP_PATH, "Starting mcp-fetch server on HTTP transport");

    axum::serve(listener, http_router(handler))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_transport_answers_initialize() {
        let router = http_router(FetchServer::new(&AppConfig::default()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let response = reqwest::Client::new()
            .post(format!("http://{addr}{MCP_PATH}"))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/event-stream")
            .body(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18","capabilities":{},"clientInfo":{"name":"test","version":"1.0"}}}"#)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.text().await.unwrap();
        assert!(body.contains(r#""id":1"#));
        assert!(body.contains("mcp-fetch"));

        handle.abort();
    }
}
