//! Readable content extraction.
//!
//! Provides a stable extraction abstraction that can be swapped later.
//!
//! ### Primary Algorithm
//! - Readability-style main-content selection over the parsed DOM (see [`candidates`]).
//! - The chosen subtree is cleaned of the same boilerplate the scorer ignores
//!   (chrome tags, navigation roles, ad and sidebar classes), then rendered to
//!   Markdown with ATX headings and fenced code blocks.
//!
//! ### Failure Handling
//! - Extraction failure is not fatal: [`simplify`] turns it into the
//!   [`SIMPLIFY_FAILED`] marker so the caller still receives a response.

pub mod candidates;
pub mod detect;

pub use candidates::{clean_html, select_main_content};
pub use detect::is_html;

use htmd::HtmlToMarkdown;
use htmd::options::{CodeBlockStyle, HeadingStyle, Options};
use scraper::Html;

/// Text returned in place of content when HTML could not be simplified.
pub const SIMPLIFY_FAILED: &str = "<e>Page failed to be simplified from HTML</e>";

/// Error type for extraction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractError {
    #[error("no readable content found")]
    NoContent,

    #[error("markdown conversion failed: {0}")]
    Conversion(String),
}

/// Text produced from a page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Markdown, the failure marker, or the untouched body
    pub text: String,
    /// False when the text is raw or the failure marker
    pub was_simplified: bool,
}

impl ExtractedContent {
    /// Content passed through without simplification.
    pub fn raw(text: impl Into<String>) -> Self {
        Self { text: text.into(), was_simplified: false }
    }
}

/// Stable extractor trait for content extraction.
///
/// This allows swapping the extraction engine later without changing the pipeline.
pub trait Extractor: Send + Sync {
    /// Extract the main content of `html` as Markdown.
    fn extract(&self, html: &str) -> Result<String, ExtractError>;
}

/// Readability-style extractor rendering Markdown through htmd.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadabilityExtractor;

impl ReadabilityExtractor {
    pub fn new() -> Self {
        Self
    }

    fn converter() -> HtmlToMarkdown {
        HtmlToMarkdown::builder()
            .options(Options {
                heading_style: HeadingStyle::Atx,
                code_block_style: CodeBlockStyle::Fenced,
                ..Default::default()
            })
            .build()
    }
}

impl Extractor for ReadabilityExtractor {
    fn extract(&self, html: &str) -> Result<String, ExtractError> {
        let doc = Html::parse_document(html);
        let main = select_main_content(&doc).ok_or(ExtractError::NoContent)?;

        let markdown = Self::converter()
            .convert(&clean_html(main))
            .map_err(|e| ExtractError::Conversion(e.to_string()))?;

        let markdown = markdown.trim();
        if markdown.is_empty() {
            return Err(ExtractError::NoContent);
        }

        Ok(markdown.to_string())
    }
}

/// Run `extractor`, substituting the failure marker when nothing usable comes back.
pub fn simplify(extractor: &dyn Extractor, html: &str) -> ExtractedContent {
    match extractor.extract(html) {
        Ok(text) => ExtractedContent { text, was_simplified: true },
        Err(e) => {
            tracing::debug!("HTML simplification failed: {}", e);
            ExtractedContent::raw(SIMPLIFY_FAILED)
        }
    }
}

/// Extract readable content from HTML using the default extractor.
pub fn extract_readable(html: &str) -> ExtractedContent {
    simplify(&ReadabilityExtractor::new(), html)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Test Article</title>
            <style>body { color: red; }</style>
        </head>
        <body>
            <nav><a href="/">Home</a> | <a href="/blog">Blog</a></nav>
            <article>
                <h1>Main Heading</h1>
                <p>This is a test paragraph with some <strong>important</strong> content.</p>
                <h2>Details</h2>
                <ul><li>First point</li><li>Second point</li></ul>
                <script>trackVisit();</script>
            </article>
        </body>
        </html>
    "#;

    struct FailingExtractor;

    impl Extractor for FailingExtractor {
        fn extract(&self, _html: &str) -> Result<String, ExtractError> {
            Err(ExtractError::NoContent)
        }
    }

    #[test]
    fn test_extract_readable_basic() {
        let extracted = extract_readable(SIMPLE_HTML);

        assert!(extracted.was_simplified);
        assert!(extracted.text.contains("# Main Heading"));
        assert!(extracted.text.contains("## Details"));
        assert!(extracted.text.contains("**important**"));
        assert!(extracted.text.contains("First point"));
    }

    #[test]
    fn test_extract_strips_boilerplate() {
        let extracted = extract_readable(SIMPLE_HTML);

        assert!(!extracted.text.contains("Home"));
        assert!(!extracted.text.contains("trackVisit"));
        assert!(!extracted.text.contains("color: red"));
    }

    #[test]
    fn test_extract_strips_ads_and_navigation_inside_article() {
        let html = r#"<html><body><article>
            <header><h1>The Title</h1></header>
            <p>Real paragraph text that belongs to the story itself.</p>
            <div class="sponsor-banner">BUY NOW CHEAP PILLS</div>
            <div role="navigation"><a href="/x">Next post</a></div>
            <p>Second paragraph of the story.</p>
        </article></body></html>"#;

        let extracted = extract_readable(html);
        assert!(extracted.text.contains("# The Title"));
        assert!(extracted.text.contains("Real paragraph text"));
        assert!(extracted.text.contains("Second paragraph"));
        assert!(!extracted.text.contains("BUY NOW"));
        assert!(!extracted.text.contains("Next post"));
    }

    #[test]
    fn test_extract_empty_html() {
        let extracted = extract_readable("");
        assert!(!extracted.was_simplified);
        assert_eq!(extracted.text, SIMPLIFY_FAILED);
    }

    #[test]
    fn test_extract_script_only_html() {
        let extracted = extract_readable("<html><body><script>main()</script></body></html>");
        assert_eq!(extracted.text, SIMPLIFY_FAILED);
    }

    #[test]
    fn test_extract_plain_text_input() {
        let extracted = extract_readable("not really html");
        assert!(extracted.was_simplified);
        assert_eq!(extracted.text, "not really html");
    }

    #[test]
    fn test_simplify_uses_marker_on_failure() {
        let extracted = simplify(&FailingExtractor, SIMPLE_HTML);
        assert_eq!(extracted, ExtractedContent::raw(SIMPLIFY_FAILED));
    }
}
