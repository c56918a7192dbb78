use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

/// Caller-facing lookup failures. Upstream trouble never shows up here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Why an upstream exchange produced nothing usable.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream call timed out after {0:?}")]
    Timeout(Duration),
    #[error("upstream returned status {0}")]
    Status(StatusCode),
    #[error("upstream body is not a volumes document: {0}")]
    Decode(#[from] serde_json::Error),
}

impl UpstreamError {
    /// Metrics label.
    pub fn reason(&self) -> &'static str {
        match self {
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Status(_) => "status",
            UpstreamError::Decode(_) => "decode",
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport(err.to_string())
    }
}
