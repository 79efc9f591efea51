//! CLI error taxonomy.
//!
//! Every failure surfaces as a payload with `error`, `status`, and `hint`
//! fields in the active output format, and a non-zero exit code.

use raindrip_api::ApiError;
use raindrip_toon::EncodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Not logged in. Run `raindrip login` first.")]
    NotLoggedIn,

    /// Malformed CLI input, caught before any request is issued.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid JSON input provided to command.")]
    InvalidJson(#[source] serde_json::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to encode output: {0}")]
    Encode(#[from] EncodeError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn status(&self) -> u16 {
        match self {
            Self::NotLoggedIn => 401,
            Self::Validation(_) | Self::InvalidJson(_) => 400,
            Self::Api(err) => err.status(),
            Self::Encode(_) | Self::Io(_) | Self::Json(_) => 500,
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotLoggedIn => Some(
                "Run `raindrip login` with the API token from \
                 https://app.raindrop.io/settings/integrations.",
            ),
            Self::Validation(_) => Some("Check the command arguments and try again."),
            Self::InvalidJson(_) => {
                Some("Ensure your JSON data is valid and properly escaped for the shell.")
            }
            Self::Api(err) => err.hint(),
            _ => None,
        }
    }
}
