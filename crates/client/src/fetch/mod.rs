//! HTTP retrieval with robots.txt compliance.
//!
//! ### Client lifetime
//! - One [`FetchClient`] is built per tool invocation and dropped when the
//!   invocation ends, so connections never outlive a call.
//! - The same client serves the robots.txt request and the page request.
//!
//! ### Retrieval
//! - GET with the configured User-Agent, redirects followed.
//! - Page timeout: 30s (configurable). robots.txt timeout: 10s (configurable).
//! - Status >= 400 is an error; no retries.
//!
//! ### robots.txt Compliance
//! - 401/403 on robots.txt: autonomous fetching denied.
//! - Other 4xx: no policy, fetching allowed.
//! - Otherwise the body is parsed and evaluated for the User-Agent.

pub mod robots;
pub mod url;

use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use robots::{RobotsChecker, RobotsDecision};
pub use url::{UrlError, canonicalize, robots_txt_url};

use fetchmcp_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string sent with every request
    pub user_agent: String,

    /// Page request timeout (default: 30s)
    pub timeout: Duration,

    /// robots.txt request timeout (default: 10s)
    pub robots_timeout: Duration,

    /// Maximum number of redirects to follow (default: 10)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            robots_timeout: config.robots_timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// A page as returned by the server.
#[derive(Debug, Clone)]
pub struct RetrievedPage {
    /// The URL after redirects
    pub final_url: ::url::Url,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header, empty when absent
    pub content_type: String,
    /// Decoded response body
    pub body: String,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Why a page could not be retrieved.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("status code {0}")]
    Status(u16),
}

impl RetrievalError {
    /// Convert to the pipeline error, naming the URL the way the caller wrote it.
    pub fn for_url(&self, url: &str) -> Error {
        match self {
            RetrievalError::Transport(e) => Error::HttpError(format!("Failed to fetch {url}: {e}")),
            RetrievalError::Status(code) => Error::HttpError(format!("Failed to fetch {url} - status code {code}")),
        }
    }
}

/// HTTP client scoped to a single fetch invocation.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a client, routing all traffic through `proxy_url` when given.
    pub fn new(config: FetchConfig, proxy_url: Option<&str>) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);

        if let Some(proxy) = proxy_url {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| Error::InvalidInput(format!("invalid proxy URL {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| Error::InvalidInput(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Check whether robots.txt permits fetching `url` autonomously.
    pub async fn check_robots(&self, url: &::url::Url) -> Result<RobotsDecision, Error> {
        RobotsChecker::new(&self.http, &self.config).check(url).await
    }

    /// Retrieve `url`, failing on transport errors and error statuses.
    pub async fn get(&self, url: &::url::Url) -> Result<RetrievedPage, RetrievalError> {
        let start = Instant::now();

        let response = self.http.get(url.as_str()).timeout(self.config.timeout).send().await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(RetrievalError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response.text().await?;

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} in {}ms ({} bytes)", url, final_url, fetch_ms, body.len());

        Ok(RetrievedPage { final_url, status: status.as_u16(), content_type, body, fetch_ms })
    }
}
