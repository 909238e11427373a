//! Error types for calls to upstream services.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("{service} request timed out")]
    Timeout { service: &'static str },

    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned an unreadable body: {message}")]
    InvalidBody {
        service: &'static str,
        message: String,
    },
}

impl UpstreamError {
    /// Classify a reqwest failure, keeping timeouts distinct
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout { service }
        } else {
            UpstreamError::Transport {
                service,
                message: err.to_string(),
            }
        }
    }
}

/// Failure to find anything usable in a workflow response
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Response missing state")]
    MissingState,
}
