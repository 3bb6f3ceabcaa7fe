//! Geographic coordinate primitives.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display-only fallback used when a search center cannot be resolved
/// (roughly the geographic center of Singapore).
pub const FALLBACK_CENTER: GeoPoint = GeoPoint {
    latitude: 1.3521,
    longitude: 103.8198,
};

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),

    #[error("unparseable coordinate \"{0}\"")]
    Unparseable(String),
}

/// A validated WGS84 latitude/longitude pair in degrees.
///
/// Unresolved locations are modelled as `Option<GeoPoint>::None`; a
/// `GeoPoint` always holds real coordinates. Fields are private and
/// deserialization goes through [`GeoPoint::new`], so an out-of-range point
/// cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = CoordinateError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either component is non-finite or
    /// outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a point from spherical math output: latitude is clamped to
    /// the poles and longitude wrapped into `[-180, 180)`.
    pub(crate) fn normalized(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: (longitude + 540.0).rem_euclid(360.0) - 180.0,
        }
    }

    #[must_use]
    pub fn latitude(self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(self) -> f64 {
        self.longitude
    }

    /// Parses string coordinates as returned by geocoding services
    /// (`"1.3691"`, `"103.8454"`).
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::Unparseable`] for non-numeric input, or a
    /// range error for out-of-range values.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, CoordinateError> {
        let lat = latitude
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::Unparseable(latitude.to_string()))?;
        let lon = longitude
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::Unparseable(longitude.to_string()))?;
        Self::new(lat, lon)
    }

    /// Builds a point from a GeoJSON position, which is ordered
    /// `[longitude, latitude, (altitude)]`.
    ///
    /// Returns `None` for positions with fewer than two components or
    /// out-of-range values.
    #[must_use]
    pub fn from_geojson_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Self::new(*lat, *lon).ok(),
            _ => None,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
