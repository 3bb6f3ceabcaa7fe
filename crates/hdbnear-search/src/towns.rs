//! Town-set derivation around a search center.
//!
//! The center and eight compass probes at the search radius are
//! reverse-geocoded concurrently; each resolved postal sector contributes
//! its town.

use futures::stream::{self, StreamExt};
use hdbnear_core::distance::destination_point;
use hdbnear_core::sectors::{is_postal_code, town_for, town_for_sector};
use hdbnear_core::{FailureKind, GeoPoint, TownSet};
use hdbnear_onemap::{AccessToken, OneMapClient};

const PROBE_BEARINGS_DEG: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

/// The center followed by eight compass points at `radius_km`. A zero
/// radius probes the center only.
#[must_use]
pub fn probe_points(center: GeoPoint, radius_km: f64) -> Vec<GeoPoint> {
    let mut points = vec![center];
    if radius_km > 0.0 {
        points.extend(
            PROBE_BEARINGS_DEG
                .iter()
                .map(|bearing| destination_point(center, *bearing, radius_km)),
        );
    }
    points
}

#[derive(Debug, Clone, Default)]
pub struct TownSetOutcome {
    pub towns: TownSet,
    pub probes: usize,
    /// Probes that produced no mapped town, failed or not.
    pub misses: usize,
    /// Classified errors among the misses.
    pub failures: Vec<FailureKind>,
}

/// Builds the town set for a search.
///
/// A six-digit `query` contributes its own sector's town even if the
/// reverse lookups all fail.
pub async fn derive_town_set(
    onemap: &OneMapClient,
    token: &AccessToken,
    center: GeoPoint,
    query: &str,
    radius_km: f64,
    max_concurrency: usize,
) -> TownSetOutcome {
    let mut outcome = TownSetOutcome::default();

    if is_postal_code(query) {
        if let Some(town) = town_for(query) {
            outcome.towns.insert(town);
        }
    }

    let probes = probe_points(center, radius_km);
    outcome.probes = probes.len();

    let results: Vec<(GeoPoint, Result<Option<String>, FailureKind>)> = stream::iter(probes)
        .map(|point| async move {
            let result = onemap
                .try_resolve_reverse(token, point)
                .await
                .map_err(|e| {
                    tracing::warn!(%point, kind = ?e.kind(), error = %e, "town probe failed");
                    e.kind()
                });
            (point, result)
        })
        .buffer_unordered(max_concurrency.max(1))
        .collect()
        .await;

    for (point, result) in results {
        match result {
            Ok(Some(sector)) => {
                if let Some(town) = town_for_sector(&sector) {
                    outcome.towns.insert(town);
                } else {
                    tracing::debug!(%point, %sector, "probe sector has no town");
                    outcome.misses += 1;
                }
            }
            Ok(None) => {
                tracing::debug!(%point, "probe found no building");
                outcome.misses += 1;
            }
            Err(kind) => {
                outcome.misses += 1;
                outcome.failures.push(kind);
            }
        }
    }

    tracing::debug!(
        towns = outcome.towns.len(),
        probes = outcome.probes,
        misses = outcome.misses,
        "town set derived"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use hdbnear_core::haversine_km;

    use super::*;

    #[test]
    fn probes_ring_the_center_at_radius() {
        let center = GeoPoint::new(1.3521, 103.8198).unwrap();
        let points = probe_points(center, 3.0);
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], center);
        for p in &points[1..] {
            assert!((haversine_km(center, *p) - 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_radius_probes_center_only() {
        let center = GeoPoint::new(1.3, 103.8).unwrap();
        assert_eq!(probe_points(center, 0.0), vec![center]);
    }
}
