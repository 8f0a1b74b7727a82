//! Fetch pipeline: policy check, retrieval, extraction, pagination.
//!
//! Each call to [`FetchPipeline::run`] is independent. It builds its own HTTP
//! client, makes at most two requests (robots.txt, then the page) and holds no
//! state afterwards, so one pipeline can serve any number of concurrent calls.

use std::sync::Arc;

use fetchmcp_core::{AppConfig, Error};

use crate::extract::{ExtractedContent, Extractor, ReadabilityExtractor, is_html, simplify};
use crate::fetch::{FetchClient, FetchConfig, RetrievedPage, RobotsDecision, canonicalize};
use crate::paginate::paginate;

/// Default number of characters per page.
pub const DEFAULT_MAX_LENGTH: usize = 5000;

/// Parameters of one fetch invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Absolute http(s) URL to fetch
    pub url: String,
    /// Maximum characters to return
    pub max_length: usize,
    /// Character offset to start from
    pub start_index: usize,
    /// Skip HTML simplification
    pub raw: bool,
    /// Skip the robots.txt check
    pub ignore_robots_txt: bool,
    /// Proxy for both requests of this invocation
    pub proxy_url: Option<String>,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_length: DEFAULT_MAX_LENGTH,
            start_index: 0,
            raw: false,
            ignore_robots_txt: false,
            proxy_url: None,
        }
    }
}

impl FetchRequest {
    /// Create a new request with the given URL and default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Default::default() }
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn start_index(mut self, start_index: usize) -> Self {
        self.start_index = start_index;
        self
    }

    /// Return the body as-is instead of simplified Markdown.
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn ignore_robots_txt(mut self, ignore: bool) -> Self {
        self.ignore_robots_txt = ignore;
        self
    }

    pub fn proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }
}

/// A successful fetch, already paginated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResult {
    /// Raw-content notice, empty for simplified HTML
    pub prefix: String,
    /// The page of content
    pub body: String,
    /// The URL as requested
    pub url: String,
    /// Offset of the next page, if any
    pub next_start_index: Option<usize>,
    /// Whether the body came from HTML simplification
    pub was_simplified: bool,
}

impl PagedResult {
    /// True when the caller has received the last page.
    pub fn done(&self) -> bool {
        self.next_start_index.is_none()
    }

    /// The text payload handed to tool callers.
    pub fn to_text(&self) -> String {
        format!("{}Contents of {}:\n{}", self.prefix, self.url, self.body)
    }
}

/// Notice placed before content that was not simplified.
pub fn raw_content_prefix(content_type: &str) -> String {
    format!("Content type {content_type} cannot be simplified to markdown, but here is the raw content:\n")
}

/// Orchestrates robots.txt checks, retrieval, extraction and pagination.
#[derive(Clone)]
pub struct FetchPipeline {
    config: FetchConfig,
    default_proxy: Option<String>,
    respect_robots: bool,
    extractor: Arc<dyn Extractor>,
}

impl FetchPipeline {
    /// Build a pipeline from application configuration using the readability extractor.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: FetchConfig::from(config),
            default_proxy: config.proxy_url.clone(),
            respect_robots: config.respect_robots,
            extractor: Arc::new(ReadabilityExtractor::new()),
        }
    }

    /// Replace the HTML extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Run one fetch, returning the typed outcome.
    pub async fn run(&self, request: &FetchRequest) -> Result<PagedResult, Error> {
        if request.url.trim().is_empty() {
            return Err(Error::InvalidInput("URL is required".into()));
        }
        if request.max_length == 0 {
            return Err(Error::InvalidInput("max_length must be greater than 0".into()));
        }

        let url = canonicalize(&request.url).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let proxy = request.proxy_url.as_deref().or(self.default_proxy.as_deref());
        let client = FetchClient::new(self.config.clone(), proxy)?;

        if self.respect_robots && !request.ignore_robots_txt {
            match client.check_robots(&url).await? {
                RobotsDecision::Denied(reason) => {
                    tracing::warn!(url = %url, "robots.txt denied fetch");
                    return Err(Error::RobotsDisallowed(reason));
                }
                decision => tracing::debug!(url = %url, ?decision, "robots.txt permits fetch"),
            }
        }

        let requested = request.url.trim();
        let page = client.get(&url).await.map_err(|e| {
            tracing::warn!(url = %url, "retrieval failed: {}", e);
            e.for_url(requested)
        })?;
        tracing::debug!(
            url = %url,
            final_url = %page.final_url,
            status = page.status,
            content_type = %page.content_type,
            fetch_ms = page.fetch_ms,
            "page retrieved"
        );

        let (content, prefix) = self.select_content(page, request.raw);
        let paged = paginate(&content.text, request.start_index, request.max_length);

        Ok(PagedResult {
            prefix,
            body: paged.body,
            url: requested.to_string(),
            next_start_index: paged.next_start_index,
            was_simplified: content.was_simplified,
        })
    }

    /// Run one fetch and render the outcome as tool text.
    ///
    /// Failures come back as `Error: ...` or `Error fetching URL: ...` text.
    pub async fn run_to_text(&self, request: &FetchRequest) -> String {
        match self.run(request).await {
            Ok(result) => result.to_text(),
            Err(e) => e.to_tool_text(),
        }
    }

    /// Simplify HTML unless raw output was requested; pass everything else through with a notice.
    fn select_content(&self, page: RetrievedPage, force_raw: bool) -> (ExtractedContent, String) {
        if is_html(&page.body, &page.content_type) && !force_raw {
            return (simplify(self.extractor.as_ref(), &page.body), String::new());
        }
        let prefix = raw_content_prefix(&page.content_type);
        (ExtractedContent::raw(page.body), prefix)
    }
}
