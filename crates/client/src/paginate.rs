//! Deterministic slicing of long content into caller-sized pages.
//!
//! Offsets and lengths count characters, never bytes, so a page boundary
//! cannot split a code point.

/// Body returned when `start_index` is at or past the end of the content.
pub const NO_MORE_CONTENT: &str = "<e>No more content available.</e>";

/// One page of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The slice, possibly followed by a continuation notice, or [`NO_MORE_CONTENT`]
    pub body: String,
    /// Offset to request next, when content remains
    pub next_start_index: Option<usize>,
}

impl Page {
    /// True when no further page exists.
    pub fn done(&self) -> bool {
        self.next_start_index.is_none()
    }
}

/// Continuation notice appended to a truncated page.
pub fn continuation_notice(next_start_index: usize) -> String {
    format!(
        "\n\n<e>Content truncated. Call the fetch tool with a start_index of {next_start_index} to get more content.</e>"
    )
}

/// Return the page of `content` starting at character `start_index` holding at most `max_length` characters.
pub fn paginate(content: &str, start_index: usize, max_length: usize) -> Page {
    let total = content.chars().count();
    if start_index >= total {
        return exhausted();
    }

    let slice: String = content.chars().skip(start_index).take(max_length).collect();
    if slice.is_empty() {
        return exhausted();
    }

    let taken = slice.chars().count();
    let remaining = total - (start_index + taken);

    if taken == max_length && remaining > 0 {
        let next = start_index + taken;
        let mut body = slice;
        body.push_str(&continuation_notice(next));
        return Page { body, next_start_index: Some(next) };
    }

    Page { body: slice, next_start_index: None }
}

fn exhausted() -> Page {
    Page { body: NO_MORE_CONTENT.to_string(), next_start_index: None }
}
