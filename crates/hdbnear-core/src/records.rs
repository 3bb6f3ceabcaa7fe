//! Candidate records produced by dataset adapters and the enriched results
//! handed back to callers.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Which dataset a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ResaleFlat,
    School,
    Eldercare,
    TransitExit,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::ResaleFlat,
        Category::School,
        Category::Eldercare,
        Category::TransitExit,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::ResaleFlat => "resale_flat",
            Category::School => "school",
            Category::Eldercare => "eldercare",
            Category::TransitExit => "transit_exit",
        }
    }

    /// Whether fetches for this category are scoped by town.
    #[must_use]
    pub fn is_town_scoped(self) -> bool {
        matches!(self, Category::ResaleFlat | Category::School)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "resale_flat" | "resale" | "flat" | "flats" => Ok(Category::ResaleFlat),
            "school" | "schools" => Ok(Category::School),
            "eldercare" => Ok(Category::Eldercare),
            "transit_exit" | "transit" | "mrt" => Ok(Category::TransitExit),
            other => Err(format!("unknown category \"{other}\"")),
        }
    }
}

/// A single HDB resale transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResaleFlat {
    /// Transaction month, `YYYY-MM`.
    pub month: Option<String>,
    pub town: Option<String>,
    pub flat_type: Option<String>,
    pub flat_model: Option<String>,
    pub block: String,
    pub street_name: String,
    pub storey_range: Option<String>,
    pub floor_area_sqm: Option<f64>,
    pub lease_commence_date: Option<String>,
    pub remaining_lease: Option<String>,
    pub resale_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub town: Option<String>,
    pub zone: Option<String>,
    /// e.g. `PRIMARY`, `SECONDARY`, `JUNIOR COLLEGE`.
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EldercareFacility {
    pub building: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitExit {
    pub station: String,
    pub exit_code: Option<String>,
}

/// Category-specific payload of a [`CandidateRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateDetails {
    ResaleFlat(ResaleFlat),
    School(School),
    Eldercare(EldercareFacility),
    TransitExit(TransitExit),
}

impl CandidateDetails {
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            CandidateDetails::ResaleFlat(_) => Category::ResaleFlat,
            CandidateDetails::School(_) => Category::School,
            CandidateDetails::Eldercare(_) => Category::Eldercare,
            CandidateDetails::TransitExit(_) => Category::TransitExit,
        }
    }
}

/// A record pulled from an external dataset, scoped to one search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub label: String,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    /// Coordinates supplied by the dataset itself, if any.
    pub location: Option<GeoPoint>,
    pub details: CandidateDetails,
}

impl CandidateRecord {
    #[must_use]
    pub fn category(&self) -> Category {
        self.details.category()
    }

    /// The query string to geocode this record with, if it needs geocoding.
    ///
    /// Flats use `"{block} {street} Singapore"`; schools use their postal
    /// code. Records that already carry a location return `None`.
    #[must_use]
    pub fn geocode_query(&self) -> Option<String> {
        if self.location.is_some() {
            return None;
        }
        match &self.details {
            CandidateDetails::ResaleFlat(flat) => {
                Some(format!("{} {} Singapore", flat.block, flat.street_name))
            }
            CandidateDetails::School(_) => self.postal_code.clone(),
            CandidateDetails::Eldercare(_) | CandidateDetails::TransitExit(_) => None,
        }
    }
}

/// A candidate within the search radius, annotated with its distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedResult {
    pub category: Category,
    pub record: CandidateRecord,
    pub location: GeoPoint,
    /// Great-circle distance from the search center in km, rounded to 2 dp.
    pub distance_km: f64,
}
