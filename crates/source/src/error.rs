//! Source error types.

use thiserror::Error;

/// Longest remote error body kept in a [`SourceError::RemoteRequest`].
pub const MAX_ERROR_BODY_CHARS: usize = 512;

/// Errors raised while fetching tags from the remote source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request never produced a response (connect, DNS, timeout, body read).
    #[error("tag source unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("tag source returned {status}: {body}")]
    RemoteRequest { status: u16, body: String },

    /// The body could not be read as a tag listing.
    #[error("tag source returned a malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid endpoint or HTTP client setup.
    #[error("tag source configuration error: {0}")]
    Config(String),
}

impl SourceError {
    /// Build a `RemoteRequest` error, truncating the body for display.
    pub fn remote(status: u16, body: &str) -> Self {
        let body = match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        Self::RemoteRequest { status, body }
    }

    /// Map a failure while reading the response body.
    ///
    /// Content that cannot be decoded is the source's fault, not the network's.
    pub fn from_body_read(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::MalformedResponse(format!("undecodable body: {err}"))
        } else {
            SourceError::Transport(err)
        }
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Transport(_) => "transport",
            SourceError::RemoteRequest { .. } => "remote_request",
            SourceError::MalformedResponse(_) => "malformed_response",
            SourceError::Config(_) => "config",
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::MalformedResponse(err.to_string())
    }
}

/// Result type for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;
