use hdbnear_datagov::DataGovError;
use hdbnear_onemap::OneMapError;
use thiserror::Error;

/// Errors that stop a search before any external call is made.
///
/// Failures of individual lookups never surface here; they are counted in
/// [`SearchDiagnostics`](crate::SearchDiagnostics).
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,

    #[error("search radius must be a finite, non-negative number of km (got {0})")]
    InvalidRadius(f64),

    #[error("failed to build geocoding client: {0}")]
    OneMapClient(#[source] OneMapError),

    #[error("failed to build dataset client: {0}")]
    DataGovClient(#[source] DataGovError),
}
