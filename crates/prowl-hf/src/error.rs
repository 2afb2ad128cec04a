//! Internal error types for catalog operations.
//!
//! These are internal to `prowl-hf`; they are mapped into the core
//! [`InstallError`](prowl_core::InstallError) taxonomy at the port
//! boundary in `port.rs`.

use thiserror::Error;

/// Result type alias for catalog operations.
pub type HfResult<T> = Result<T, HfError>;

/// Maximum response-body length kept for diagnostics.
const BODY_SNIPPET_LEN: usize = 200;

/// Truncate a response body for inclusion in error messages.
#[must_use]
pub fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= BODY_SNIPPET_LEN {
        trimmed.to_string()
    } else {
        let mut end = BODY_SNIPPET_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}

/// Errors from the `HuggingFace` catalog API.
#[derive(Debug, Error)]
pub enum HfError {
    /// API request failed with an HTTP error status.
    #[error("catalog request failed with status {status}: {body}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Truncated response body for diagnostics.
        body: String,
    },

    /// API returned a response that is not the JSON we expect.
    #[error("malformed catalog response: {message}")]
    InvalidResponse {
        /// What was malformed, including a truncated body.
        message: String,
    },

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL construction error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<HfError> for prowl_core::InstallError {
    fn from(err: HfError) -> Self {
        match err {
            HfError::ApiRequestFailed { status, body } => Self::network_with_status(
                format!("catalog request failed (HTTP {status}): {body}"),
                status,
            ),
            HfError::InvalidResponse { message } => Self::network(message),
            HfError::Network(e) => Self::network(e.to_string()),
            HfError::InvalidUrl(e) => Self::network(format!("invalid catalog URL: {e}")),
        }
    }
}
