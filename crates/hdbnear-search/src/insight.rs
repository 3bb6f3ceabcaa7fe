//! Resale-specific annotations attached to flat results.

use hdbnear_core::resale::{metrics, price_history, PricePoint, ResaleMetrics};
use hdbnear_core::{CandidateDetails, EnrichedResult, ResaleFlat};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatInsight {
    pub metrics: ResaleMetrics,
    /// Monthly average price for the same block, street, and flat type,
    /// from the transactions fetched for this search.
    pub price_history: Vec<PricePoint>,
}

/// A result as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub result: EnrichedResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resale: Option<FlatInsight>,
}

/// Wraps `results`, annotating resale flats using `transactions`.
#[must_use]
pub fn annotate(results: Vec<EnrichedResult>, transactions: &[ResaleFlat]) -> Vec<SearchHit> {
    results
        .into_iter()
        .map(|result| {
            let resale = match &result.record.details {
                CandidateDetails::ResaleFlat(flat) => Some(FlatInsight {
                    metrics: metrics(flat),
                    price_history: price_history(transactions, flat),
                }),
                _ => None,
            };
            SearchHit { result, resale }
        })
        .collect()
}
