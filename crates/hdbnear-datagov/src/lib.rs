//! data.gov.sg client: datastore search, GeoJSON poll-download, and the
//! adapters that turn raw rows into candidate records.

pub mod client;
pub mod error;
pub mod filters;
pub mod geojson;
pub mod markup;
pub mod records;
pub mod types;

pub use client::DataGovClient;
pub use error::DataGovError;
pub use filters::{FilterValue, Filters, Pagination, DEFAULT_PAGE_LIMIT};
pub use records::to_candidates;
pub use types::RawRecord;
