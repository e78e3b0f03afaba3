//! Errors raised while talking to a weather provider.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ProviderError {
    /// Message shown to the user. Every cause is presented the same way;
    /// the variant itself stays available for logging.
    pub fn user_message(&self) -> &'static str {
        "City not found"
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CityNotFound(_))
    }

    /// Short machine-friendly label of the cause.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CityNotFound(_) => "not_found",
            Self::Status { .. } => "status",
            Self::Malformed(_) => "malformed",
            Self::Network(_) => "network",
        }
    }
}
