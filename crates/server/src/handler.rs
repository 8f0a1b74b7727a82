//! MCP server handler.
//!
//! Every tool delegates to the same [`FetchPipeline`], built once at startup.

use crate::tools::{FetchParams, UrlParams, UrlWithLengthParams, fetch_impl, simple_request};

use fetchmcp_client::FetchPipeline;
use fetchmcp_core::AppConfig;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

#[derive(Clone)]
pub struct FetchServer {
    pipeline: FetchPipeline,
    default_max_length: usize,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FetchServer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            pipeline: FetchPipeline::new(config),
            default_max_length: config.default_max_length,
            tool_router: Self::tool_router(),
        }
    }

    /// Fetch a URL with every option exposed.
    #[tool(
        description = "Fetches a URL from the internet and extracts its contents as markdown. Long pages are returned in chunks: use start_index to continue where a previous call was truncated. Set raw to get the page without simplification."
    )]
    async fn fetch(&self, params: Parameters<FetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.pipeline, params.0.into_request(self.default_max_length)).await
    }

    #[tool(description = "Fetches a URL and returns its contents as markdown using default settings.")]
    async fn fetch_simple(&self, params: Parameters<UrlParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.pipeline, simple_request(params.0)).await
    }

    #[tool(description = "Fetches a URL and returns its raw content without converting HTML to markdown.")]
    async fn fetch_raw(&self, params: Parameters<UrlWithLengthParams>) -> Result<CallToolResult, McpError> {
        let params = FetchParams { raw: true, ..FetchParams::from(params.0) };
        fetch_impl(&self.pipeline, params.into_request(self.default_max_length)).await
    }

    /// Same as `fetch_simple` with robots.txt checking skipped.
    #[tool(description = "Fetches a URL as markdown without checking the site's robots.txt.")]
    async fn fetch_ignore_robots(&self, params: Parameters<UrlWithLengthParams>) -> Result<CallToolResult, McpError> {
        let params = FetchParams { ignore_robots_txt: true, ..FetchParams::from(params.0) };
        fetch_impl(&self.pipeline, params.into_request(self.default_max_length)).await
    }
}

impl ServerHandler for FetchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-fetch".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some("Fetch web pages as markdown. Respects robots.txt unless told otherwise.".into()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_all_fetch_tools() {
        let server = FetchServer::new(&AppConfig::default());
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, ["fetch", "fetch_ignore_robots", "fetch_raw", "fetch_simple"]);
    }

    #[test]
    fn test_server_info() {
        let info = FetchServer::new(&AppConfig::default()).get_info();
        assert_eq!(info.server_info.name, "mcp-fetch");
        assert!(info.capabilities.tools.is_some());
    }
}
