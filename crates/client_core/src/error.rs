use std::time::Duration;

use shared::error::ValidationError;
use thiserror::Error;

/// Message shown for every transport-level failure; details go to the log only.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Request failed. Please try again.";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid prediction endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        source: url::ParseError,
    },
    #[error("unsupported endpoint scheme '{0}'; expected http or https")]
    UnsupportedScheme(String),
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("prediction request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("prediction service returned status {0}")]
    Status(u16),
    #[error("prediction response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("prediction request timed out after {0:?}")]
    Timeout(Duration),
}

impl TransportError {
    pub(crate) fn from_send(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Request(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Why a submission cycle ended without a result.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("prediction service rejected the request: {0}")]
    Logical(String),
}

impl SubmitError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Transport(_) => TRANSPORT_FAILURE_MESSAGE.to_string(),
            Self::Logical(message) if message.trim().is_empty() => {
                TRANSPORT_FAILURE_MESSAGE.to_string()
            }
            Self::Logical(message) => message.clone(),
        }
    }
}
