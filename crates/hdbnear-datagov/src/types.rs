//! data.gov.sg response types and the flat [`RawRecord`] they are reduced to.

use hdbnear_core::GeoPoint;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One untyped dataset row: either a datastore record or a GeoJSON feature
/// flattened to its attribute table plus coordinates.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RawRecord {
    pub fields: Map<String, Value>,
    /// Coordinates carried by the source itself (GeoJSON geometry).
    pub location: Option<GeoPoint>,
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            location: None,
        }
    }
}

impl RawRecord {
    /// Builds a record from string attributes, e.g. a parsed markup table.
    pub fn from_attributes<I, K, V>(attributes: I, location: Option<GeoPoint>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = attributes
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        Self { fields, location }
    }

    /// Text value of `key`, trimmed. Numbers are rendered as text. Empty
    /// strings and the `"NIL"` placeholder read as absent.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        let text = match self.fields.get(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        if text.is_empty() || text.eq_ignore_ascii_case("NIL") {
            None
        } else {
            Some(text)
        }
    }

    /// Numeric value of `key`, accepting numbers or numeric strings.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        let number = match self.fields.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|n| n.is_finite())
    }
}

// ---------------------------------------------------------------------------
// Datastore search
// ---------------------------------------------------------------------------

/// `GET /api/action/datastore_search` response.
#[derive(Debug, Deserialize)]
pub struct DatastoreResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<DatastoreResult>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct DatastoreResult {
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(default)]
    pub total: Option<u64>,
}

// ---------------------------------------------------------------------------
// Poll-download
// ---------------------------------------------------------------------------

/// `GET /v1/public/api/datasets/{id}/poll-download` response.
#[derive(Debug, Deserialize)]
pub struct PollDownloadResponse {
    pub code: i64,
    #[serde(default)]
    pub data: Option<PollDownloadData>,
    #[serde(rename = "errorMsg", default)]
    pub error_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PollDownloadData {
    #[serde(default)]
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// GeoJSON
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub coordinates: Value,
}

impl Geometry {
    /// First position in the geometry, descending through nested arrays for
    /// non-point shapes.
    #[must_use]
    pub fn first_position(&self) -> Option<Vec<f64>> {
        let mut current = &self.coordinates;
        loop {
            let items = current.as_array()?;
            match items.first()? {
                Value::Array(_) => current = items.first()?,
                _ => return items.iter().map(Value::as_f64).collect(),
            }
        }
    }
}
