//! HTTP client for the OneMap geocoding API.
//!
//! Wraps `reqwest` with OneMap-specific URL building, bearer-token headers,
//! and typed response parsing. Every lookup comes in two flavours: a
//! fallible `try_*` method returning [`OneMapError`], and a best-effort
//! method that logs the failure and returns `None`.

use std::time::Duration;

use hdbnear_core::GeoPoint;
use reqwest::{Client, Url};

use crate::auth::AccessToken;
use crate::error::OneMapError;
use crate::types::{AddressMatch, ReverseResponse, ReverseResult, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://www.onemap.gov.sg/";

/// Search buffer, in metres, for reverse lookups.
pub const REVERSE_BUFFER_METRES: u32 = 40;

/// Client for the OneMap API.
///
/// Use [`OneMapClient::new`] for production or
/// [`OneMapClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct OneMapClient {
    pub(crate) client: Client,
    base_url: Url,
}

impl OneMapClient {
    /// Creates a client pointed at the production OneMap API.
    ///
    /// # Errors
    ///
    /// Returns [`OneMapError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, OneMapError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OneMapError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`OneMapError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, OneMapError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        // A trailing slash keeps `Url::join` appending rather than replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| OneMapError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Forward-geocodes `query`, returning the first match's coordinates.
    ///
    /// `Ok(None)` means OneMap answered with zero matches.
    ///
    /// # Errors
    ///
    /// - [`OneMapError::Http`] / [`OneMapError::UnexpectedStatus`] on
    ///   transport failure or a non-2xx status.
    /// - [`OneMapError::Deserialize`] if the body is not the expected shape.
    /// - [`OneMapError::InvalidCoordinates`] if the match's coordinates do
    ///   not parse.
    pub async fn try_resolve_forward(
        &self,
        token: &AccessToken,
        query: &str,
    ) -> Result<Option<GeoPoint>, OneMapError> {
        Ok(self
            .try_search_address(token, query)
            .await?
            .map(|m| m.point))
    }

    /// Like [`try_resolve_forward`](Self::try_resolve_forward) but keeps the
    /// matched address and postal code.
    ///
    /// # Errors
    ///
    /// See [`try_resolve_forward`](Self::try_resolve_forward).
    pub async fn try_search_address(
        &self,
        token: &AccessToken,
        query: &str,
    ) -> Result<Option<AddressMatch>, OneMapError> {
        let url = self.build_url(
            "api/common/elastic/search",
            &[
                ("searchVal", query),
                ("returnGeom", "Y"),
                ("getAddrDetails", "Y"),
                ("pageNum", "1"),
            ],
        );
        let body = self.get_text(token, &url).await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| OneMapError::Deserialize {
                context: format!("search(searchVal={query})"),
                source: e,
            })?;

        if parsed.found == 0 {
            return Ok(None);
        }
        let Some(first) = parsed.results.into_iter().next() else {
            return Ok(None);
        };

        let point = GeoPoint::parse(&first.latitude, &first.longitude).map_err(|e| {
            OneMapError::InvalidCoordinates {
                context: format!("search(searchVal={query})"),
                source: e,
            }
        })?;

        Ok(Some(AddressMatch {
            point,
            address: first.address.or(first.search_val),
            postal_code: first.postal,
        }))
    }

    /// Best-effort forward geocode: any failure is logged and yields `None`.
    pub async fn resolve_forward(&self, token: &AccessToken, query: &str) -> Option<GeoPoint> {
        match self.try_resolve_forward(token, query).await {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!(query, kind = ?e.kind(), error = %e, "forward geocode failed");
                None
            }
        }
    }

    /// Reverse-geocodes `point` within a 40 m buffer and returns the first
    /// building found.
    ///
    /// # Errors
    ///
    /// - [`OneMapError::Http`] / [`OneMapError::UnexpectedStatus`] on
    ///   transport failure or a non-2xx status.
    /// - [`OneMapError::Deserialize`] if the body is not the expected shape.
    pub async fn try_reverse_lookup(
        &self,
        token: &AccessToken,
        point: GeoPoint,
    ) -> Result<Option<ReverseResult>, OneMapError> {
        let location = point.to_string();
        let buffer = REVERSE_BUFFER_METRES.to_string();
        let url = self.build_url(
            "api/public/revgeocode",
            &[
                ("location", &location),
                ("buffer", &buffer),
                ("addressType", "All"),
                ("otherFeatures", "N"),
            ],
        );
        let body = self.get_text(token, &url).await?;
        let parsed: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| OneMapError::Deserialize {
                context: format!("revgeocode(location={location})"),
                source: e,
            })?;
        Ok(parsed.geocode_info.into_iter().next())
    }

    /// Reverse-geocodes `point` to its two-digit postal sector.
    ///
    /// `Ok(None)` when nothing was found or the postal code is malformed.
    ///
    /// # Errors
    ///
    /// See [`try_reverse_lookup`](Self::try_reverse_lookup).
    pub async fn try_resolve_reverse(
        &self,
        token: &AccessToken,
        point: GeoPoint,
    ) -> Result<Option<String>, OneMapError> {
        let found = self.try_reverse_lookup(token, point).await?;
        Ok(found.and_then(|r| r.postal_sector().map(str::to_owned)))
    }

    /// Best-effort reverse geocode: any failure is logged and yields `None`.
    pub async fn resolve_reverse(&self, token: &AccessToken, point: GeoPoint) -> Option<String> {
        match self.try_resolve_reverse(token, point).await {
            Ok(sector) => sector,
            Err(e) => {
                tracing::warn!(%point, kind = ?e.kind(), error = %e, "reverse geocode failed");
                None
            }
        }
    }

    /// Builds a full request URL under the base URL with percent-encoded
    /// query parameters.
    pub(crate) fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!(
            "{}{}",
            self.base_url.path(),
            path.trim_start_matches('/')
        ));
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends an authenticated GET, asserts a 2xx status, and returns the body.
    async fn get_text(&self, token: &AccessToken, url: &Url) -> Result<String, OneMapError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token.value())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OneMapError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
