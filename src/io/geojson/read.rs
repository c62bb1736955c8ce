use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};

use crate::collection::{Feature, FeatureCollection};
use super::geometry::geometry_from_json;

/// Read a GeoJSON FeatureCollection from a file at `path`.
pub fn read_geojson_file(path: &Path) -> Result<FeatureCollection> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read GeoJSON file: {}", path.display()))?;
    read_from_geojson_bytes(&bytes)
        .with_context(|| format!("Failed to parse GeoJSON file: {}", path.display()))
}

/// Read a GeoJSON FeatureCollection from bytes.
pub fn read_from_geojson_bytes(bytes: &[u8]) -> Result<FeatureCollection> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;

    let Value::Object(mut root) = value else { bail!("GeoJSON document is not an object") };

    match root.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        other => bail!("Expected a FeatureCollection, found type {other:?}"),
    }

    let features = match root.remove("features") {
        Some(Value::Array(features)) => features,
        Some(_) => bail!("FeatureCollection features must be an array"),
        None => Vec::new(),
    };

    let features = features.into_iter()
        .enumerate()
        .map(|(idx, feature)| parse_feature(feature).with_context(|| format!("Invalid feature at index {idx}")))
        .collect::<Result<Vec<_>>>()?;

    FeatureCollection::from_parts(features, root.remove("crs"), root.remove("name"))
}

fn parse_feature(value: Value) -> Result<Feature> {
    let Value::Object(mut feature) = value else { bail!("Feature is not an object") };

    if feature.get("type").and_then(Value::as_str) != Some("Feature") {
        return Err(anyhow!("Expected a Feature, found type {:?}", feature.get("type")));
    }

    let properties = match feature.remove("properties") {
        Some(Value::Object(properties)) => properties,
        Some(Value::Null) | None => Map::new(),
        Some(_) => bail!("Feature properties must be an object or null"),
    };

    let geometry = match feature.remove("geometry") {
        Some(Value::Null) | None => None,
        Some(geometry) => Some(geometry_from_json(&geometry)?),
    };

    Ok(Feature { id: feature.remove("id"), properties, geometry })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::crs::Crs;
    use super::*;

    fn bytes(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn reads_features_and_metadata() {
        let fc = read_from_geojson_bytes(&bytes(json!({
            "type": "FeatureCollection",
            "name": "chi-comm-areas",
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}},
            "features": [
                {
                    "type": "Feature",
                    "id": 7,
                    "properties": {"community": "LOOP", "area_num_1": "32"},
                    "geometry": {"type": "Point", "coordinates": [-87.63, 41.88]},
                },
                {"type": "Feature", "properties": null, "geometry": null},
            ],
        }))).unwrap();

        assert_eq!(fc.len(), 2);
        assert_eq!(fc.crs(), Crs::Wgs84);
        assert_eq!(fc.name(), Some(&json!("chi-comm-areas")));

        let first = fc.feature(0).unwrap();
        assert_eq!(first.id, Some(&json!(7)));
        let keys = first.properties.keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, vec!["community", "area_num_1"]);

        let second = fc.feature(1).unwrap();
        assert!(second.geometry.is_none());
        assert!(second.properties.is_empty());
    }

    #[test]
    fn property_order_is_preserved() {
        let fc = read_from_geojson_bytes(
            br#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"z":1,"a":2,"m":3},"geometry":null}]}"#
        ).unwrap();

        let keys = fc.feature(0).unwrap().properties.keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn rejects_non_collections() {
        assert!(read_from_geojson_bytes(&bytes(json!({"type": "Feature", "geometry": null}))).is_err());
        assert!(read_from_geojson_bytes(&bytes(json!([1, 2, 3]))).is_err());
        assert!(read_from_geojson_bytes(b"not json").is_err());
    }

    #[test]
    fn rejects_bad_features() {
        let bad_geometry = json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": {}, "geometry": {"type": "Point"}}],
        });
        assert!(read_from_geojson_bytes(&bytes(bad_geometry)).is_err());

        let bad_type = json!({"type": "FeatureCollection", "features": [{"type": "Point"}]});
        assert!(read_from_geojson_bytes(&bytes(bad_type)).is_err());
    }

    #[test]
    fn rejects_unknown_crs() {
        let value = json!({
            "type": "FeatureCollection",
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:ESRI::102671"}},
            "features": [],
        });
        assert!(read_from_geojson_bytes(&bytes(value)).is_err());
    }
}
