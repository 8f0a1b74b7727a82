//! Client code for mcp-fetch.
//!
//! This crate provides the fetch pipeline: robots.txt policy checks, page
//! retrieval, readable-content extraction, and pagination of the result.

pub mod extract;
pub mod fetch;
pub mod paginate;
pub mod pipeline;

pub use extract::{ExtractedContent, Extractor, ReadabilityExtractor, extract_readable, is_html};
pub use fetch::{FetchClient, FetchConfig, RetrievalError, RetrievedPage, RobotsChecker, RobotsDecision};
pub use paginate::{Page, paginate};
pub use pipeline::{DEFAULT_MAX_LENGTH, FetchPipeline, FetchRequest, PagedResult};
