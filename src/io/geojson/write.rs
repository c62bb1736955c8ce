use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Map, Serializer, Value};

use crate::collection::FeatureCollection;
use super::{geometry::geometry_to_json, IndentZeroFormatter};

/// Convert a collection to a GeoJSON value.
/// Members are ordered `type`, `features`, then `crs` and `name` when present;
/// each feature is ordered `id` (when present), `type`, `properties`, `geometry`.
pub fn to_geojson_value(fc: &FeatureCollection) -> Value {
    let features = fc.features()
        .map(|feature| {
            let mut object = Map::new();
            if let Some(id) = feature.id {
                object.insert("id".to_string(), id.clone());
            }
            object.insert("type".to_string(), json!("Feature"));
            object.insert("properties".to_string(), Value::Object(feature.properties.clone()));
            object.insert("geometry".to_string(), feature.geometry.map(geometry_to_json).unwrap_or(Value::Null));
            Value::Object(object)
        })
        .collect::<Vec<_>>();

    let mut root = Map::new();
    root.insert("type".to_string(), json!("FeatureCollection"));
    root.insert("features".to_string(), Value::Array(features));
    if let Some(crs) = fc.crs_member() {
        root.insert("crs".to_string(), crs.clone());
    }
    if let Some(name) = fc.name() {
        root.insert("name".to_string(), name.clone());
    }
    Value::Object(root)
}

/// Write a collection to GeoJSON bytes.
pub fn write_to_geojson_bytes(fc: &FeatureCollection) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_geojson(&mut out, fc)?;
    Ok(out)
}

/// Write a collection to a GeoJSON file at `path`, replacing any existing file.
pub fn write_geojson_file(path: &Path, fc: &FeatureCollection) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create GeoJSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_geojson(&mut writer, fc)
        .with_context(|| format!("Failed to write GeoJSON file: {}", path.display()))?;
    writer.flush()
        .with_context(|| format!("Failed to flush GeoJSON file: {}", path.display()))?;
    Ok(())
}

fn write_geojson<W: Write>(writer: W, fc: &FeatureCollection) -> Result<()> {
    let mut serializer = Serializer::with_formatter(writer, IndentZeroFormatter::new());
    to_geojson_value(fc).serialize(&mut serializer)
        .context("Failed to serialize GeoJSON")
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use crate::collection::Feature;
    use crate::crs::Crs;
    use super::*;

    fn sample() -> FeatureCollection {
        let mut properties = Map::new();
        properties.insert("name".to_string(), json!("Rogers Park"));
        properties.insert("area".to_string(), json!(1));
        FeatureCollection::new(
            vec![Feature { id: None, properties, geometry: Some(Point::new(-87.67, 42.01).into()) }],
            Crs::Wgs84,
        )
    }

    #[test]
    fn metadata_follows_features() {
        let fc = sample()
            .with_name(json!("areas"))
            .with_crs_member(json!({"type": "name", "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}}));

        let value = to_geojson_value(&fc);
        let keys = value.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, vec!["type", "features", "crs", "name"]);
    }

    #[test]
    fn absent_metadata_is_not_written() {
        let value = to_geojson_value(&sample());
        let keys = value.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, vec!["type", "features"]);
    }

    #[test]
    fn writes_indent_zero_layout() {
        let text = String::from_utf8(write_to_geojson_bytes(&sample()).unwrap()).unwrap();
        let expected = concat!(
            "{\n\"type\":\"FeatureCollection\",\n\"features\":[\n{\n\"type\":\"Feature\",\n",
            "\"properties\":{\n\"name\":\"Rogers Park\",\n\"area\":1\n},\n",
            "\"geometry\":{\n\"type\":\"Point\",\n\"coordinates\":[\n-87.67,\n42.01\n]\n}\n}\n]\n}",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn feature_id_is_written_only_when_present() {
        let value = to_geojson_value(&sample());
        assert!(value["features"][0].get("id").is_none());

        let feature = Feature { id: Some(json!("17")), ..Feature::default() };
        let value = to_geojson_value(&FeatureCollection::new(vec![feature], Crs::Wgs84));
        let keys = value["features"][0].as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, vec!["id", "type", "properties", "geometry"]);
        assert_eq!(value["features"][0]["id"], json!("17"));
    }

    #[test]
    fn null_geometry_is_written_as_null() {
        let fc = FeatureCollection::new(vec![Feature::default()], Crs::Wgs84);
        let value = to_geojson_value(&fc);
        assert_eq!(value["features"][0]["geometry"], Value::Null);
    }
}
