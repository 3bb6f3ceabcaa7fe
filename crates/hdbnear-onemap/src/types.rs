//! OneMap API response types.
//!
//! OneMap returns coordinates and counts as strings in some payloads and
//! numbers in others; fields that vary are deserialized leniently.

use hdbnear_core::GeoPoint;
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Elastic search
// ---------------------------------------------------------------------------

/// `GET /api/common/elastic/search` response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub found: u64,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "SEARCHVAL", default)]
    pub search_val: Option<String>,
    #[serde(rename = "ADDRESS", default)]
    pub address: Option<String>,
    #[serde(rename = "POSTAL", default)]
    pub postal: Option<String>,
    #[serde(rename = "LATITUDE", deserialize_with = "lenient_string")]
    pub latitude: String,
    #[serde(rename = "LONGITUDE", deserialize_with = "lenient_string")]
    pub longitude: String,
}

/// First forward-geocoding match, with the address details OneMap returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressMatch {
    pub point: GeoPoint,
    pub address: Option<String>,
    pub postal_code: Option<String>,
}

// ---------------------------------------------------------------------------
// Reverse geocode
// ---------------------------------------------------------------------------

/// `GET /api/public/revgeocode` response.
#[derive(Debug, Deserialize)]
pub struct ReverseResponse {
    #[serde(rename = "GeocodeInfo", default)]
    pub geocode_info: Vec<ReverseResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReverseResult {
    #[serde(rename = "BUILDINGNAME", default)]
    pub building: Option<String>,
    #[serde(rename = "BLOCK", default)]
    pub block: Option<String>,
    #[serde(rename = "ROAD", default)]
    pub road: Option<String>,
    #[serde(rename = "POSTALCODE", default)]
    pub postal_code: Option<String>,
}

impl ReverseResult {
    /// Two-digit sector of the postal code, only if the code is exactly six
    /// ASCII digits.
    #[must_use]
    pub fn postal_sector(&self) -> Option<&str> {
        let code = self.postal_code.as_deref()?.trim();
        if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
            code.get(..2)
        } else {
            None
        }
    }

    /// Human-readable single-line address, skipping `"NIL"` parts.
    #[must_use]
    pub fn address(&self) -> String {
        [&self.block, &self.road, &self.building, &self.postal_code]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty() && !part.eq_ignore_ascii_case("NIL"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ---------------------------------------------------------------------------
// Token exchange
// ---------------------------------------------------------------------------

/// `POST /api/auth/post/getToken` response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub expiry_timestamp: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Lenient scalar helpers
// ---------------------------------------------------------------------------

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("expected unsigned count, got {n}"))),
        serde_json::Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        serde_json::Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!(
            "expected count, got {other}"
        ))),
    }
}

fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_accepts_string_counts_and_coordinates() {
        let body = serde_json::json!({
            "found": "1",
            "results": [{ "LATITUDE": 1.3691, "LONGITUDE": "103.8454", "POSTAL": "560406" }]
        });
        let parsed: SearchResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.found, 1);
        assert_eq!(parsed.results[0].latitude, "1.3691");
        assert_eq!(parsed.results[0].longitude, "103.8454");
    }

    #[test]
    fn postal_sector_requires_six_digits() {
        let mut r = ReverseResult {
            building: None,
            block: None,
            road: None,
            postal_code: Some("560406".to_string()),
        };
        assert_eq!(r.postal_sector(), Some("56"));
        r.postal_code = Some("NIL".to_string());
        assert_eq!(r.postal_sector(), None);
        r.postal_code = Some("56040".to_string());
        assert_eq!(r.postal_sector(), None);
        r.postal_code = None;
        assert_eq!(r.postal_sector(), None);
    }

    #[test]
    fn address_skips_nil_parts() {
        let r = ReverseResult {
            building: Some("NIL".to_string()),
            block: Some("406".to_string()),
            road: Some("ANG MO KIO AVENUE 10".to_string()),
            postal_code: Some("560406".to_string()),
        };
        assert_eq!(r.address(), "406 ANG MO KIO AVENUE 10 560406");
    }

    #[test]
    fn token_response_parses_string_expiry() {
        let body = serde_json::json!({
            "access_token": "abc",
            "expiry_timestamp": "1759477267"
        });
        let parsed: TokenResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.access_token.as_deref(), Some("abc"));
        assert_eq!(parsed.expiry_timestamp, Some(1_759_477_267));
    }
}
