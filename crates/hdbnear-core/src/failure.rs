use serde::Serialize;

/// Coarse classification of why a best-effort lookup contributed nothing.
///
/// Every external call in the pipeline degrades to an empty contribution;
/// this tag lets callers tell an expired credential apart from a genuine
/// "no matches".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The service answered but had no usable match.
    Unresolved,
    /// Network error, timeout, or non-2xx status.
    Transport,
    /// The service rejected the credential (HTTP 401/403).
    Unauthorized,
    /// The payload was malformed or missing expected fields.
    Parse,
}

impl FailureKind {
    /// Classifies a non-success HTTP status code.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => FailureKind::Unauthorized,
            _ => FailureKind::Transport,
        }
    }
}
