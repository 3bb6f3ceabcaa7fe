//! Geo-enrichment orchestrator: resolves a search center, fans out dataset
//! fetches and geocodes with bounded concurrency, and filters by distance.

pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod geocode;
pub mod insight;
pub mod request;
pub mod stage;
pub mod towns;
pub mod work;

pub use diagnostics::{CenterStatus, FailureCounts, SearchDiagnostics};
pub use engine::{SearchEngine, SearchReport, SearchSettings};
pub use error::SearchError;
pub use insight::{FlatInsight, SearchHit};
pub use request::{SearchRequest, SortOrder};
pub use stage::SearchStage;
pub use work::{fan_out, plan_work, FetchContext, WorkItem, WorkOutcome};
