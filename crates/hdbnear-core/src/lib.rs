//! Domain types and pure logic for the hdbnear geo-enrichment pipeline.

pub mod app_config;
pub mod config;
pub mod distance;
pub mod failure;
pub mod geo;
pub mod records;
pub mod resale;
pub mod sectors;
pub mod towns;

use thiserror::Error;

pub use app_config::{AppConfig, DatasetIds, Environment, OneMapCredentials};
pub use config::{load_app_config, load_app_config_from_env};
pub use distance::{haversine_km, sort_by_distance, within_radius};
pub use failure::FailureKind;
pub use geo::{CoordinateError, GeoPoint, FALLBACK_CENTER};
pub use records::{
    CandidateDetails, CandidateRecord, Category, EldercareFacility, EnrichedResult, ResaleFlat,
    School, TransitExit,
};
pub use sectors::town_for;
pub use towns::TownSet;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
