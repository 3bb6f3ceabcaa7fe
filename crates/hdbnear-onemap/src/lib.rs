//! OneMap geocoding client: token exchange, forward search, and reverse
//! lookup to postal sectors.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::AccessToken;
pub use client::OneMapClient;
pub use error::OneMapError;
pub use types::{AddressMatch, ReverseResult};
