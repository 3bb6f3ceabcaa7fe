//! Token exchange for the OneMap API.
//!
//! Tokens are plain values threaded into every lookup; the client never
//! caches or refreshes them.

use chrono::{DateTime, Utc};

use crate::client::OneMapClient;
use crate::error::OneMapError;
use crate::types::TokenResponse;

/// A time-bounded bearer token for OneMap requests.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Wraps a token obtained out of band (e.g. from configuration). Its
    /// expiry is unknown.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// `false` when the expiry is unknown.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl OneMapClient {
    /// Exchanges service credentials for a fresh access token.
    ///
    /// # Errors
    ///
    /// - [`OneMapError::UnexpectedStatus`] on a non-2xx response (401/403
    ///   classify as unauthorized).
    /// - [`OneMapError::TokenExchange`] if the body carries no token.
    /// - [`OneMapError::Http`] on network failure.
    /// - [`OneMapError::Deserialize`] if the body is not the expected shape.
    pub async fn acquire_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccessToken, OneMapError> {
        let url = self.build_url("api/auth/post/getToken", &[]);
        let response = self
            .client
            .post(url.clone())
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OneMapError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| OneMapError::Deserialize {
                context: "getToken".to_string(),
                source: e,
            })?;

        let Some(value) = parsed.access_token.filter(|t| !t.is_empty()) else {
            return Err(OneMapError::TokenExchange(
                parsed
                    .error
                    .unwrap_or_else(|| "response did not include access_token".to_string()),
            ));
        };

        let mut token = AccessToken::new(value);
        if let Some(exp) = parsed
            .expiry_timestamp
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        {
            token = token.with_expiry(exp);
        }
        tracing::debug!(expires_at = ?token.expires_at(), "acquired OneMap token");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_expiry_never_expires() {
        let token = AccessToken::new("abc");
        assert!(!token.is_expired_at(Utc::now()));
    }

    #[test]
    fn expiry_is_inclusive() {
        let exp = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let token = AccessToken::new("abc").with_expiry(exp);
        assert!(token.is_expired_at(exp));
        assert!(!token.is_expired_at(exp - chrono::Duration::seconds(1)));
    }

    #[test]
    fn debug_redacts_value() {
        let token = AccessToken::new("very-secret");
        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
