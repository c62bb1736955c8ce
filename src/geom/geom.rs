use geo::{BooleanOps, Geometry, MultiPolygon, Polygon};
use rstar::{RTree, AABB};

use crate::crs::Crs;
use crate::geom::BoundingBox;

/// Geometries of a feature collection, indexed by feature position, with an R-tree
/// over their bounding boxes. Null geometries keep their slot so indices line up.
#[derive(Debug, Clone)]
pub struct Geometries {
    shapes: Vec<Option<Geometry<f64>>>,
    rtree: RTree<BoundingBox>,
    crs: Crs,
}

impl Geometries {
    /// Construct a Geometries object from per-feature shapes in the given CRS.
    pub fn new(shapes: Vec<Option<Geometry<f64>>>, crs: Crs) -> Self {
        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(i, shape)| BoundingBox::of(i, shape.as_ref()?))
                    .collect()
            ),
            shapes,
            crs,
        }
    }

    /// Get the number of slots (features), including null geometries.
    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    /// Check if there are no slots.
    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Get a reference to the per-feature shapes.
    #[inline] pub fn shapes(&self) -> &[Option<Geometry<f64>>] { &self.shapes }

    /// Get the shape at `idx`, if it exists and is not null.
    #[inline] pub fn get(&self, idx: usize) -> Option<&Geometry<f64>> {
        self.shapes.get(idx)?.as_ref()
    }

    #[inline] pub fn crs(&self) -> Crs { self.crs }

    /// Indices of shapes whose bounding boxes intersect the envelope, in ascending order.
    pub fn query_indices(&self, envelope: &AABB<[f64; 2]>) -> Vec<usize> {
        let mut indices = self.rtree.locate_in_envelope_intersecting(envelope)
            .map(|bbox| bbox.idx())
            .collect::<Vec<_>>();
        indices.sort_unstable();
        indices
    }

    /// Union every polygonal part of every shape into a single MultiPolygon.
    /// Non-polygonal shapes are ignored; the result is empty if nothing is polygonal.
    pub fn union(&self) -> MultiPolygon<f64> {
        self.shapes.iter()
            .flatten()
            .map(|shape| MultiPolygon::new(polygonal_parts(shape)))
            .filter(|parts| !parts.0.is_empty())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(|| MultiPolygon::new(Vec::new()))
    }
}

/// Collect the polygons making up a geometry (recursing into collections).
pub(crate) fn polygonal_parts(geometry: &Geometry<f64>) -> Vec<Polygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => vec![polygon.clone()],
        Geometry::MultiPolygon(multi) => multi.0.clone(),
        Geometry::Rect(rect) => vec![rect.to_polygon()],
        Geometry::Triangle(triangle) => vec![triangle.to_polygon()],
        Geometry::GeometryCollection(collection) => collection.iter()
            .flat_map(polygonal_parts)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, Area, Point};

    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]
    }

    #[test]
    fn null_shapes_keep_their_slot() {
        let geoms = Geometries::new(
            vec![Some(square(0.0, 0.0, 1.0).into()), None, Some(square(5.0, 5.0, 1.0).into())],
            Crs::Wgs84,
        );

        assert_eq!(geoms.len(), 3);
        assert!(geoms.get(1).is_none());
        assert!(geoms.get(2).is_some());
        assert!(geoms.get(3).is_none());
    }

    #[test]
    fn query_returns_sorted_intersecting_indices() {
        let geoms = Geometries::new(
            vec![
                Some(square(10.0, 10.0, 1.0).into()),
                Some(square(0.0, 0.0, 1.0).into()),
                None,
                Some(square(0.5, 0.5, 1.0).into()),
            ],
            Crs::Wgs84,
        );

        let envelope = AABB::from_corners([0.0, 0.0], [2.0, 2.0]);
        assert_eq!(geoms.query_indices(&envelope), vec![1, 3]);
    }

    #[test]
    fn union_merges_overlapping_parts() {
        let geoms = Geometries::new(
            vec![
                Some(square(0.0, 0.0, 2.0).into()),
                Some(MultiPolygon::new(vec![square(1.0, 0.0, 2.0)]).into()),
                Some(Point::new(100.0, 100.0).into()),
            ],
            Crs::Wgs84,
        );

        let union = geoms.union();
        assert_eq!(union.0.len(), 1);
        assert!((union.unsigned_area() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn union_of_non_polygonal_shapes_is_empty() {
        let geoms = Geometries::new(vec![Some(Point::new(1.0, 1.0).into()), None], Crs::Wgs84);
        assert!(geoms.union().0.is_empty());
    }
}
