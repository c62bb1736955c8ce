use anyhow::{Context, Result};
use geo::Geometry;
use serde_json::{Map, Value};

use crate::crs::Crs;
use crate::geom::Geometries;

/// An owned GeoJSON feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    pub id: Option<Value>,
    pub properties: Map<String, Value>,
    pub geometry: Option<Geometry<f64>>,
}

/// A borrowed view of one feature in a collection.
#[derive(Debug, Clone, Copy)]
pub struct FeatureRef<'a> {
    pub id: Option<&'a Value>,
    pub properties: &'a Map<String, Value>,
    pub geometry: Option<&'a Geometry<f64>>,
}

/// An ordered feature collection with its top-level `name` and `crs` members.
/// Attributes are stored column-wise next to the spatially indexed geometries.
#[derive(Debug, Clone)]
pub struct FeatureCollection {
    name: Option<Value>,
    crs_member: Option<Value>,
    ids: Vec<Option<Value>>,
    properties: Vec<Map<String, Value>>,
    geoms: Geometries,
}

impl FeatureCollection {
    /// Build a collection in the given CRS with no top-level metadata.
    pub fn new(features: Vec<Feature>, crs: Crs) -> Self {
        let mut ids = Vec::with_capacity(features.len());
        let mut properties = Vec::with_capacity(features.len());
        let mut shapes = Vec::with_capacity(features.len());

        for feature in features {
            ids.push(feature.id);
            properties.push(feature.properties);
            shapes.push(feature.geometry);
        }

        Self { name: None, crs_member: None, ids, properties, geoms: Geometries::new(shapes, crs) }
    }

    /// Build a collection from parsed parts; the CRS is taken from the raw `crs` member.
    pub fn from_parts(features: Vec<Feature>, crs_member: Option<Value>, name: Option<Value>) -> Result<Self> {
        let crs = crs_member.as_ref()
            .map(Crs::from_member)
            .transpose()
            .context("Unsupported crs member")?
            .unwrap_or_default();

        Ok(Self { name, crs_member, ..Self::new(features, crs) })
    }

    /// Set the top-level `name` member.
    pub fn with_name(mut self, name: Value) -> Self {
        self.name = Some(name);
        self
    }

    /// Set the raw top-level `crs` member without touching the coordinates' CRS.
    pub fn with_crs_member(mut self, member: Value) -> Self {
        self.crs_member = Some(member);
        self
    }

    #[inline] pub fn len(&self) -> usize { self.ids.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    #[inline] pub fn name(&self) -> Option<&Value> { self.name.as_ref() }

    #[inline] pub fn crs_member(&self) -> Option<&Value> { self.crs_member.as_ref() }

    /// CRS the coordinates are expressed in.
    #[inline] pub fn crs(&self) -> Crs { self.geoms.crs() }

    #[inline] pub fn geoms(&self) -> &Geometries { &self.geoms }

    /// Get the feature at `idx`.
    pub fn feature(&self, idx: usize) -> Option<FeatureRef<'_>> {
        Some(FeatureRef {
            id: self.ids.get(idx)?.as_ref(),
            properties: self.properties.get(idx)?,
            geometry: self.geoms.get(idx),
        })
    }

    /// Iterate over the features in order.
    pub fn features(&self) -> impl Iterator<Item = FeatureRef<'_>> {
        (0..self.len()).filter_map(|idx| self.feature(idx))
    }

    /// Return a copy with all coordinates in WGS84. Metadata members are kept as-is.
    pub fn to_wgs84(&self) -> Result<Self> {
        let geoms = self.geoms.reproject_to_wgs84()
            .with_context(|| format!("Failed to reproject from {}", self.crs()))?;
        Ok(Self { geoms, ..self.clone() })
    }

    /// Build a new collection from selected features with replacement geometries.
    /// Top-level metadata is carried over unchanged.
    pub(crate) fn select(&self, picks: Vec<(usize, Geometry<f64>)>) -> Self {
        let features = picks.into_iter()
            .filter(|(idx, _)| *idx < self.len())
            .map(|(idx, geometry)| Feature {
                id: self.ids[idx].clone(),
                properties: self.properties[idx].clone(),
                geometry: Some(geometry),
            })
            .collect();

        Self {
            name: self.name.clone(),
            crs_member: self.crs_member.clone(),
            ..Self::new(features, self.crs())
        }
    }
}
