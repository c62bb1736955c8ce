use anyhow::{anyhow, Context, Result};
use geo::{Coord, Geometry, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::crs::Crs;
use crate::geom::Geometries;

/// Coordinate transform between two CRSs.
/// Geographic systems take and return degrees; proj4rs works in radians for them.
pub(crate) struct Reprojector {
    source: Crs,
    target: Crs,
    from: Proj4,
    to: Proj4,
}

impl Reprojector {
    pub(crate) fn new(source: Crs, target: Crs) -> Result<Self> {
        let from = source.projection()
            .with_context(|| anyhow!("failed to build source projection {source}"))?;
        let to = target.projection()
            .with_context(|| anyhow!("failed to build target projection {target}"))?;

        Ok(Self { source, target, from, to })
    }

    /// Transform a single coordinate.
    pub(crate) fn coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = if self.from.is_latlong() {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };

        transform(&self.from, &self.to, &mut point)
            .with_context(|| anyhow!("CRS transform failed for ({}, {}) {} -> {}", coord.x, coord.y, self.source, self.target))?;

        let (x, y) = if self.to.is_latlong() {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };

        if !x.is_finite() || !y.is_finite() {
            return Err(anyhow!("CRS transform produced a non-finite coordinate for ({}, {}) {} -> {}",
                coord.x, coord.y, self.source, self.target));
        }

        Ok(Coord { x, y })
    }

    /// Transform every coordinate of a geometry.
    pub(crate) fn geometry(&self, geometry: &Geometry<f64>) -> Result<Geometry<f64>> {
        geometry.try_map_coords(|coord| self.coord(coord))
    }
}

impl Geometries {
    /// Reproject all shapes to WGS84 lon/lat. Returns a copy if already in WGS84.
    pub fn reproject_to_wgs84(&self) -> Result<Geometries> {
        if self.crs().is_wgs84() { return Ok(self.clone()) }

        let reprojector = Reprojector::new(self.crs(), Crs::Wgs84)?;
        let shapes = self.shapes().iter()
            .map(|shape| shape.as_ref().map(|geometry| reprojector.geometry(geometry)).transpose())
            .collect::<Result<Vec<_>>>()?;

        Ok(Geometries::new(shapes, Crs::Wgs84))
    }
}
