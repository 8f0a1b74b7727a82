//! Content-type routing.

/// Number of leading characters of the body inspected for an `<html` marker.
const SNIFF_CHARS: usize = 100;

/// Decide whether a response should be treated as HTML.
///
/// True when any of these hold:
/// - the first 100 characters of `body` contain `<html` (case-sensitive)
/// - `content_type` contains `text/html`
/// - `content_type` is empty
pub fn is_html(body: &str, content_type: &str) -> bool {
    let head_end = body.char_indices().nth(SNIFF_CHARS).map_or(body.len(), |(idx, _)| idx);
    body[..head_end].contains("<html") || content_type.contains("text/html") || content_type.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_content_type() {
        assert!(is_html("plain words", "text/html; charset=utf-8"));
    }

    #[test]
    fn test_missing_content_type_is_html() {
        assert!(is_html("{\"a\": 1}", ""));
    }

    #[test]
    fn test_html_marker_in_body_overrides_header() {
        assert!(is_html("<!DOCTYPE html>\n<html lang=\"en\"><body></body></html>", "text/plain"));
    }

    #[test]
    fn test_html_marker_is_case_sensitive() {
        assert!(!is_html("<HTML><BODY>x</BODY></HTML>", "text/plain"));
    }

    #[test]
    fn test_html_marker_beyond_prefix_is_ignored() {
        let body = format!("{}<html>", "x".repeat(100));
        assert!(!is_html(&body, "text/plain"));

        let body = format!("{}<html>", "x".repeat(95));
        assert!(is_html(&body, "text/plain"));
    }

    #[test]
    fn test_prefix_counts_characters_not_bytes() {
        let body = format!("{}<html>", "é".repeat(90));
        assert!(is_html(&body, "application/json"));
    }

    #[test]
    fn test_json_is_not_html() {
        assert!(!is_html("{\"key\": \"value\"}", "application/json"));
    }
}
