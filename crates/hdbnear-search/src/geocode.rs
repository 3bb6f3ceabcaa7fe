//! Second fan-out pass: attach coordinates to candidates that lack them.

use futures::stream::{self, StreamExt};
use hdbnear_core::{CandidateRecord, FailureKind, GeoPoint};
use hdbnear_onemap::{AccessToken, OneMapClient};

/// How a candidate's location was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located {
    /// The dataset supplied coordinates.
    Supplied,
    /// Resolved through the geocoder.
    Geocoded,
    /// No coordinates and nothing to geocode with.
    Skipped,
    /// A geocode was attempted and produced nothing.
    Missed(FailureKind),
}

#[derive(Debug, Clone, Default)]
pub struct GeocodeOutcome {
    /// Candidates in completion order, each with its location if any.
    pub candidates: Vec<(CandidateRecord, Option<GeoPoint>)>,
    pub attempts: usize,
    pub misses: usize,
    /// Why each miss happened.
    pub failures: Vec<FailureKind>,
}

async fn locate(
    onemap: &OneMapClient,
    token: &AccessToken,
    record: CandidateRecord,
) -> (CandidateRecord, Option<GeoPoint>, Located) {
    if let Some(location) = record.location {
        return (record, Some(location), Located::Supplied);
    }
    let Some(query) = record.geocode_query() else {
        return (record, None, Located::Skipped);
    };
    match onemap.try_resolve_forward(token, &query).await {
        Ok(Some(point)) => (record, Some(point), Located::Geocoded),
        Ok(None) => {
            tracing::debug!(%query, "no geocode match for candidate");
            (record, None, Located::Missed(FailureKind::Unresolved))
        }
        Err(e) => {
            tracing::debug!(%query, kind = ?e.kind(), error = %e, "candidate geocode failed");
            (record, None, Located::Missed(e.kind()))
        }
    }
}

/// Geocodes every candidate without its own coordinates, with at most
/// `max_concurrency` lookups in flight. Records carrying coordinates pass
/// through untouched.
pub async fn geocode_candidates(
    onemap: &OneMapClient,
    token: &AccessToken,
    candidates: Vec<CandidateRecord>,
    max_concurrency: usize,
) -> GeocodeOutcome {
    let located: Vec<(CandidateRecord, Option<GeoPoint>, Located)> = stream::iter(candidates)
        .map(|record| locate(onemap, token, record))
        .buffer_unordered(max_concurrency.max(1))
        .collect()
        .await;

    let mut outcome = GeocodeOutcome {
        candidates: Vec::with_capacity(located.len()),
        ..GeocodeOutcome::default()
    };
    for (record, point, how) in located {
        match how {
            Located::Geocoded => outcome.attempts += 1,
            Located::Missed(kind) => {
                outcome.attempts += 1;
                outcome.misses += 1;
                outcome.failures.push(kind);
            }
            Located::Supplied | Located::Skipped => {}
        }
        outcome.candidates.push((record, point));
    }

    if outcome.misses > 0 {
        tracing::warn!(
            attempts = outcome.attempts,
            misses = outcome.misses,
            "some candidates could not be geocoded"
        );
    }
    outcome
}
