use hdbnear_core::FailureKind;
use thiserror::Error;

/// Errors returned by the data.gov.sg client.
#[derive(Debug, Error)]
pub enum DataGovError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered with `success: false` or a non-zero `code`.
    #[error("data.gov.sg rejected {context}: {message}")]
    Unsuccessful { context: String, message: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl DataGovError {
    /// Maps this error onto the pipeline's failure taxonomy.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            DataGovError::Http(e) => e
                .status()
                .map_or(FailureKind::Transport, |s| FailureKind::from_status(s.as_u16())),
            DataGovError::UnexpectedStatus { status, .. } => FailureKind::from_status(*status),
            DataGovError::Deserialize { .. } => FailureKind::Parse,
            DataGovError::Unsuccessful { .. } | DataGovError::InvalidBaseUrl { .. } => {
                FailureKind::Transport
            }
        }
    }
}
