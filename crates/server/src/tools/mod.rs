//! MCP tool implementations.
//!
//! All four fetch tools share one implementation and differ only in which
//! parameters they expose.

pub mod fetch;

pub use fetch::{FetchParams, UrlParams, UrlWithLengthParams, fetch_impl, simple_request};
