//! Flattening of GeoJSON features into [`RawRecord`]s.

use hdbnear_core::GeoPoint;
use serde_json::Value;

use crate::markup::parse_attribute_table;
use crate::types::{Feature, FeatureCollection, RawRecord};

const DESCRIPTION_KEY: &str = "Description";

/// Flattens every feature in `collection`. Features are never dropped here;
/// one without usable geometry comes back with `location: None`.
#[must_use]
pub fn features_to_records(collection: FeatureCollection) -> Vec<RawRecord> {
    collection
        .features
        .into_iter()
        .map(feature_to_record)
        .collect()
}

/// Merges the feature's plain properties with the attribute table embedded
/// in `properties.Description`; table entries win on conflict. Coordinates
/// are read as `[longitude, latitude]`.
#[must_use]
pub fn feature_to_record(feature: Feature) -> RawRecord {
    let location = feature
        .geometry
        .as_ref()
        .and_then(|g| g.first_position())
        .and_then(|pos| GeoPoint::from_geojson_position(&pos));

    let mut record = RawRecord {
        fields: serde_json::Map::new(),
        location,
    };

    let Some(properties) = feature.properties else {
        return record;
    };

    for (key, value) in properties {
        if key == DESCRIPTION_KEY {
            if let Value::String(markup) = &value {
                for (attr, text) in parse_attribute_table(markup) {
                    record.fields.insert(attr, Value::String(text));
                }
            }
            continue;
        }
        record.fields.entry(key).or_insert(value);
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(json: Value) -> FeatureCollection {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn inverts_coordinates_and_parses_description() {
        let fc = collection(serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "Name": "kml_1",
                    "Description": "<table><tr><th>STATION_NA</th><td>BISHAN MRT STATION</td></tr><tr><th>EXIT_CODE</th><td>Exit A</td></tr></table>"
                },
                "geometry": { "type": "Point", "coordinates": [103.82, 1.30, 0.0] }
            }]
        }));

        let records = features_to_records(fc);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        let loc = r.location.expect("should carry a location");
        assert!((loc.latitude() - 1.30).abs() < f64::EPSILON);
        assert!((loc.longitude() - 103.82).abs() < f64::EPSILON);
        assert_eq!(r.text("STATION_NA").as_deref(), Some("BISHAN MRT STATION"));
        assert_eq!(r.text("EXIT_CODE").as_deref(), Some("Exit A"));
        assert_eq!(r.text("Name").as_deref(), Some("kml_1"));
        assert!(r.text("Description").is_none());
    }

    #[test]
    fn table_entries_override_plain_properties() {
        let fc = collection(serde_json::json!({
            "features": [{
                "properties": {
                    "NAME": "stale",
                    "Description": "<tr><th>NAME</th><td>fresh</td></tr>"
                },
                "geometry": null
            }]
        }));
        let records = features_to_records(fc);
        assert_eq!(records[0].text("NAME").as_deref(), Some("fresh"));
        assert!(records[0].location.is_none());
    }

    #[test]
    fn out_of_range_geometry_is_unresolved() {
        let fc = collection(serde_json::json!({
            "features": [{
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [1.30, 103.82] }
            }]
        }));
        assert!(features_to_records(fc)[0].location.is_none());
    }
}
