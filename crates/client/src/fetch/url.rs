//! URL validation and robots.txt location.

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("URL is required")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Parse a caller-supplied URL string into an absolute http(s) URL.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Require an http or https scheme and a host
///
/// Path, query and fragment are kept as given.
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let parsed = url::Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost(trimmed.to_string()));
    }

    Ok(parsed)
}

/// Location of the robots.txt governing `url`.
///
/// Scheme, credentials, host and port are kept; path, query and fragment are
/// replaced with `/robots.txt`.
pub fn robots_txt_url(url: &url::Url) -> url::Url {
    let mut robots = url.clone();
    robots.set_path("/robots.txt");
    robots.set_query(None);
    robots.set_fragment(None);
    robots
}

/// The part of `url` that robots.txt rules are matched against: path plus query.
pub fn robots_match_target(url: &url::Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_basic() {
        let url = canonicalize("https://example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("example.com/page").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.path(), "/page");
    }

    #[test]
    fn test_canonicalize_trim_whitespace() {
        let url = canonicalize("  https://example.com  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize(""), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_canonicalize_invalid() {
        let result = canonicalize("http://exa mple.com");
        assert!(matches!(result, Err(UrlError::InvalidUrl(_))));
    }

    #[test]
    fn test_robots_txt_url_replaces_path_query_fragment() {
        let url = canonicalize("https://example.com/a/b?x=1#frag").unwrap();
        assert_eq!(robots_txt_url(&url).as_str(), "https://example.com/robots.txt");
    }

    #[test]
    fn test_robots_txt_url_keeps_port() {
        let url = canonicalize("http://127.0.0.1:8080/docs/page.html").unwrap();
        assert_eq!(robots_txt_url(&url).as_str(), "http://127.0.0.1:8080/robots.txt");
    }

    #[test]
    fn test_robots_match_target() {
        let url = canonicalize("https://example.com/private/x?q=1").unwrap();
        assert_eq!(robots_match_target(&url), "/private/x?q=1");

        let url = canonicalize("https://example.com").unwrap();
        assert_eq!(robots_match_target(&url), "/");
    }
}
