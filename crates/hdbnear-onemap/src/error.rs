use hdbnear_core::{CoordinateError, FailureKind};
use thiserror::Error;

/// Errors returned by the OneMap API client.
#[derive(Debug, Error)]
pub enum OneMapError {
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

    /// A result carried coordinates that are not valid numbers or are out of range.
    #[error("invalid coordinates in {context}: {source}")]
    InvalidCoordinates {
        context: String,
        #[source]
        source: CoordinateError,
    },

    /// The token exchange answered 2xx but did not hand back a token.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl OneMapError {
    /// Maps this error onto the pipeline's failure taxonomy.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            OneMapError::Http(e) => e
                .status()
                .map_or(FailureKind::Transport, |s| FailureKind::from_status(s.as_u16())),
            OneMapError::UnexpectedStatus { status, .. } => FailureKind::from_status(*status),
            OneMapError::Deserialize { .. } | OneMapError::InvalidCoordinates { .. } => {
                FailureKind::Parse
            }
            OneMapError::TokenExchange(_) => FailureKind::Unauthorized,
            OneMapError::InvalidBaseUrl { .. } => FailureKind::Transport,
        }
    }
}
