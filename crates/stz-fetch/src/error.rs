use thiserror::Error;

use stz_core::error::CoreError;

/// HTTP request errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Unknown HTTP method: {0:?}")]
    UnknownMethod(String),

    #[error("Invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode response body (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Transport(error)
        }
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
