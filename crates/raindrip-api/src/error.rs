//! Error types for the Raindrop.io client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx response from the API, message forwarded from upstream.
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Rate limit still exhausted after the retry budget.
    #[error("rate limit exceeded, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    /// 5xx from upstream after the retry budget.
    #[error("{0}")]
    Upstream(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered 2xx but the body was not the JSON we expected.
    #[error("invalid response from API: {0}")]
    InvalidResponse(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP-ish status code carried into user-visible error payloads.
    pub fn status(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
            Self::RateLimited { .. } => 429,
            Self::Upstream(_) | Self::InvalidResponse(_) => 502,
            Self::Network(_) => 503,
            Self::Url(_) | Self::Json(_) => 500,
        }
    }

    /// Actionable remediation string attached to user-visible error
    /// payloads.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Status { status: 401, .. } => {
                Some("Authentication failed. Try running `raindrip login` again.")
            }
            Self::Status { status: 404, .. } => {
                Some("The requested resource was not found. Verify the ID is correct.")
            }
            Self::RateLimited { .. } => {
                Some("Wait for the rate limit window to pass before retrying.")
            }
            Self::Network(_) => Some("Check your network connection and try again."),
            _ => None,
        }
    }
}
