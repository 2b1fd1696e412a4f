use shared::error::{ApiError, ApiException};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server responded with HTTP {status}{}", detail_suffix(.body))]
    Status {
        status: u16,
        body: Option<ApiError>,
    },
    #[error("invalid response payload: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ClientError {
    /// True when the server answered with a non-success status.
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// The server's structured error, when the response carried one.
    pub fn api_exception(&self) -> Option<ApiException> {
        match self {
            Self::Status {
                body: Some(body), ..
            } => Some(body.clone().into()),
            _ => None,
        }
    }
}

fn detail_suffix(body: &Option<ApiError>) -> String {
    body.as_ref()
        .map(|err| format!(" ({})", err.message))
        .unwrap_or_default()
}
