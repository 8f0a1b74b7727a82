//! Unified error types for mcp-fetch.
//!
//! Every failure of the fetch pipeline is one of these variants. The tool
//! boundary renders them with [`Error::to_tool_text`]; everything below it
//! works with the typed value.

/// Unified error types for the mcp-fetch server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Missing or malformed request parameters (empty URL, bad proxy, zero max_length).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// robots.txt forbids autonomous fetching, or the site refused access to robots.txt.
    #[error("ROBOTS_DISALLOWED: {0}")]
    RobotsDisallowed(String),

    /// robots.txt could not be retrieved. Treated as a denial.
    #[error("ROBOTS_FETCH_FAILED: {0}")]
    RobotsFetch(String),

    /// Transport failure or an error status while retrieving the target page.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),
}

impl Error {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::RobotsDisallowed(_) => "ROBOTS_DISALLOWED",
            Error::RobotsFetch(_) => "ROBOTS_FETCH_FAILED",
            Error::HttpError(_) => "HTTP_ERROR",
        }
    }

    /// The human-readable message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::InvalidInput(msg) | Error::RobotsDisallowed(msg) | Error::RobotsFetch(msg) | Error::HttpError(msg) => {
                msg
            }
        }
    }

    /// Render the error the way fetch tools report it to callers.
    ///
    /// Retrieval failures read `Error fetching URL: ...`; everything else reads `Error: ...`.
    pub fn to_tool_text(&self) -> String {
        match self {
            Error::HttpError(msg) => format!("Error fetching URL: {msg}"),
            _ => format!("Error: {}", self.message()),
        }
    }
}
