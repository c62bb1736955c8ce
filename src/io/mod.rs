//! IO module for format-specific reading and writing operations.
//!
//! - `geojson` - GeoJSON FeatureCollections, written in the compact one-value-per-line
//!   layout used by the published datasets

pub(crate) mod geojson;
