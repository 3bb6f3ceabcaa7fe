//! Great-circle distance filtering.
//!
//! The radius predicate runs at full precision; distances are rounded to two
//! decimal places only when the [`EnrichedResult`] is built.

use crate::geo::GeoPoint;
use crate::records::{CandidateRecord, EnrichedResult};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometres.
#[must_use]
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude().to_radians().cos()
            * b.latitude().to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Rounds a distance to two decimal places for display.
#[must_use]
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

/// Keeps candidates whose location lies within `radius_km` (inclusive) of
/// `center`, preserving input order.
///
/// Candidates with no resolved location are dropped.
#[must_use]
pub fn within_radius<I>(center: GeoPoint, candidates: I, radius_km: f64) -> Vec<EnrichedResult>
where
    I: IntoIterator<Item = (CandidateRecord, Option<GeoPoint>)>,
{
    candidates
        .into_iter()
        .filter_map(|(record, location)| {
            let location = location?;
            let distance = haversine_km(center, location);
            (distance <= radius_km).then(|| EnrichedResult {
                category: record.category(),
                record,
                location,
                distance_km: round_km(distance),
            })
        })
        .collect()
}

/// Sorts results nearest-first by their unrounded distance from `center`.
/// Stable, so equal distances keep their completion order.
pub fn sort_by_distance(center: GeoPoint, results: &mut [EnrichedResult]) {
    results.sort_by(|a, b| {
        haversine_km(center, a.location).total_cmp(&haversine_km(center, b.location))
    });
}

/// Offsets `origin` by `distance_km` along `bearing_deg` (0 = north,
/// clockwise) on the sphere.
#[must_use]
pub fn destination_point(origin: GeoPoint, bearing_deg: f64, distance_km: f64) -> GeoPoint {
    let angular = distance_km / EARTH_RADIUS_KM;
    let bearing = bearing_deg.to_radians();
    let lat1 = origin.latitude().to_radians();
    let lon1 = origin.longitude().to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    GeoPoint::normalized(lat2.to_degrees(), lon2.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CandidateDetails, TransitExit};

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn exit(name: &str) -> CandidateRecord {
        CandidateRecord {
            label: name.to_string(),
            address: None,
            postal_code: None,
            location: None,
            details: CandidateDetails::TransitExit(TransitExit {
                station: name.to_string(),
                exit_code: None,
            }),
        }
    }

    #[test]
    fn haversine_is_zero_for_same_point() {
        let p = point(1.3521, 103.8198);
        assert!(haversine_km(p, p).abs() < 1e-12);
    }

    #[test]
    fn haversine_is_symmetric() {
        let pairs = [
            (point(1.30, 103.80), point(1.35, 103.90)),
            (point(-33.86, 151.21), point(51.5, -0.12)),
            (point(0.0, 179.9), point(0.0, -179.9)),
        ];
        for (a, b) in pairs {
            assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn haversine_matches_known_offsets() {
        let center = point(1.3000, 103.8000);
        let east = haversine_km(center, point(1.3000, 103.8200));
        let north = haversine_km(center, point(1.3500, 103.8000));
        assert_eq!(round_km(east), 2.22);
        assert!((north - 5.56).abs() < 0.01, "got {north}");
    }

    #[test]
    fn within_radius_keeps_near_and_drops_far() {
        let center = point(1.3000, 103.8000);
        let results = within_radius(
            center,
            vec![
                (exit("near"), Some(point(1.3000, 103.8200))),
                (exit("far"), Some(point(1.3500, 103.8000))),
            ],
            3.0,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.label, "near");
        assert_eq!(results[0].distance_km, 2.22);
    }

    #[test]
    fn within_radius_excludes_unresolved_candidates() {
        let center = point(1.3, 103.8);
        let results = within_radius(center, vec![(exit("nowhere"), None)], 100.0);
        assert!(results.is_empty());
    }

    #[test]
    fn within_radius_boundary_is_inclusive() {
        let center = point(1.3, 103.8);
        let target = point(1.3, 103.82);
        let exact = haversine_km(center, target);
        let results = within_radius(center, vec![(exit("edge"), Some(target))], exact);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn within_radius_filters_before_rounding() {
        // 2.2233 km rounds to 2.22 but must still be excluded at r = 2.222.
        let center = point(1.3, 103.8);
        let results = within_radius(center, vec![(exit("x"), Some(point(1.3, 103.82)))], 2.222);
        assert!(results.is_empty());
    }

    #[test]
    fn within_radius_is_monotonic_in_radius() {
        let center = point(1.35, 103.85);
        let candidates: Vec<_> = (0..40)
            .map(|i| {
                let offset = f64::from(i) * 0.003;
                (exit(&format!("c{i}")), Some(point(1.35 + offset, 103.85 - offset / 2.0)))
            })
            .collect();
        for r in [0.0, 0.5, 1.0, 2.5, 4.0, 8.0] {
            let small = within_radius(center, candidates.clone(), r);
            let large = within_radius(center, candidates.clone(), r + 0.25);
            for res in &small {
                assert!(large.iter().any(|l| l.record.label == res.record.label));
            }
        }
    }

    #[test]
    fn within_radius_preserves_input_order() {
        let center = point(1.3, 103.8);
        let results = within_radius(
            center,
            vec![
                (exit("second-nearest"), Some(point(1.3, 103.81))),
                (exit("nearest"), Some(point(1.3, 103.801))),
            ],
            5.0,
        );
        assert_eq!(results[0].record.label, "second-nearest");
        assert_eq!(results[1].record.label, "nearest");
    }

    #[test]
    fn sort_by_distance_orders_nearest_first_and_is_stable() {
        let center = point(1.3, 103.8);
        let mut results = within_radius(
            center,
            vec![
                (exit("b"), Some(point(1.3, 103.81))),
                (exit("a1"), Some(point(1.3, 103.801))),
                (exit("a2"), Some(point(1.3, 103.801))),
            ],
            5.0,
        );
        sort_by_distance(center, &mut results);
        let labels: Vec<_> = results.iter().map(|r| r.record.label.as_str()).collect();
        assert_eq!(labels, vec!["a1", "a2", "b"]);
    }

    #[test]
    fn sort_by_distance_breaks_rounding_ties_by_true_distance() {
        // ~1.0038 km and ~1.0005 km both display as 1.00.
        let center = point(1.3, 103.8);
        let mut results = within_radius(
            center,
            vec![
                (exit("farther"), Some(point(1.3, 103.809_03))),
                (exit("nearer"), Some(point(1.3, 103.809))),
            ],
            5.0,
        );
        assert_eq!(results[0].distance_km, results[1].distance_km);
        sort_by_distance(center, &mut results);
        let labels: Vec<_> = results.iter().map(|r| r.record.label.as_str()).collect();
        assert_eq!(labels, vec!["nearer", "farther"]);
    }

    #[test]
    fn destination_point_lands_at_requested_distance() {
        let origin = point(1.3521, 103.8198);
        for bearing in [0.0, 45.0, 90.0, 180.0, 270.0] {
            let dest = destination_point(origin, bearing, 3.0);
            assert!((haversine_km(origin, dest) - 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn destination_point_wraps_antimeridian() {
        let dest = destination_point(point(0.0, 179.99), 90.0, 10.0);
        assert!(dest.longitude() < -179.0);
    }
}
