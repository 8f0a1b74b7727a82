//! fetch tool family implementation.
//!
//! Parameters are converted to a [`FetchRequest`], run through the shared
//! [`FetchPipeline`], and the outcome is returned as text. Failures are never
//! protocol errors: they come back as `Error...` text with `isError` set.

use fetchmcp_client::{DEFAULT_MAX_LENGTH, FetchPipeline, FetchRequest};
use fetchmcp_core::Error;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for the fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchParams {
    /// The URL to fetch.
    pub url: String,

    /// Maximum number of characters to return (default: 5000).
    #[serde(default)]
    pub max_length: Option<i64>,

    /// Return content starting at this character index (default: 0).
    #[serde(default)]
    pub start_index: Option<i64>,

    /// Return the page without simplifying HTML to Markdown (default: false).
    #[serde(default)]
    pub raw: bool,

    /// Skip the robots.txt check (default: false).
    #[serde(default)]
    pub ignore_robots_txt: bool,

    /// Proxy URL used for this request.
    #[serde(default)]
    pub proxy_url: Option<String>,
}

/// Input parameters for fetch_simple.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UrlParams {
    /// The URL to fetch.
    pub url: String,
}

/// Input parameters for fetch_raw and fetch_ignore_robots.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UrlWithLengthParams {
    /// The URL to fetch.
    pub url: String,

    /// Maximum number of characters to return (default: 5000).
    #[serde(default)]
    pub max_length: Option<i64>,
}

impl FetchParams {
    /// Convert to a pipeline request, filling omitted lengths with `default_max_length`.
    pub fn into_request(self, default_max_length: usize) -> Result<FetchRequest, Error> {
        let max_length = match self.max_length {
            Some(n) if n <= 0 => {
                return Err(Error::InvalidInput(format!("max_length must be greater than 0, got {n}")));
            }
            Some(n) => usize::try_from(n).map_err(|e| Error::InvalidInput(format!("max_length: {e}")))?,
            None => default_max_length,
        };

        let start_index = match self.start_index {
            Some(n) if n < 0 => {
                return Err(Error::InvalidInput(format!("start_index must not be negative, got {n}")));
            }
            Some(n) => usize::try_from(n).map_err(|e| Error::InvalidInput(format!("start_index: {e}")))?,
            None => 0,
        };

        let mut request = FetchRequest::new(self.url)
            .max_length(max_length)
            .start_index(start_index)
            .raw(self.raw)
            .ignore_robots_txt(self.ignore_robots_txt);
        if let Some(proxy) = self.proxy_url.filter(|p| !p.trim().is_empty()) {
            request = request.proxy_url(proxy);
        }
        Ok(request)
    }
}

impl From<UrlParams> for FetchParams {
    fn from(params: UrlParams) -> Self {
        Self {
            url: params.url,
            max_length: None,
            start_index: None,
            raw: false,
            ignore_robots_txt: false,
            proxy_url: None,
        }
    }
}

impl From<UrlWithLengthParams> for FetchParams {
    fn from(params: UrlWithLengthParams) -> Self {
        Self { max_length: params.max_length, ..FetchParams::from(UrlParams { url: params.url }) }
    }
}

/// Request for fetch_simple: always 5000 characters from offset 0, whatever the configured default.
pub fn simple_request(params: UrlParams) -> Result<FetchRequest, Error> {
    FetchParams::from(params).into_request(DEFAULT_MAX_LENGTH)
}

/// Implementation shared by all fetch tools.
pub async fn fetch_impl(
    pipeline: &FetchPipeline, request: Result<FetchRequest, Error>,
) -> Result<CallToolResult, McpError> {
    let outcome = match request {
        Ok(request) => pipeline.run(&request).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => {
            tracing::debug!(url = %result.url, done = result.done(), "fetch completed");
            Ok(CallToolResult::success(vec![Content::text(result.to_text())]))
        }
        Err(e) => {
            tracing::warn!(code = e.code(), "fetch failed: {}", e.message());
            Ok(CallToolResult::error(vec![Content::text(e.to_tool_text())]))
        }
    }
}
