use geo::{BoundingRect, Geometry};
use rstar::{RTreeObject, AABB};

/// R-tree entry: the envelope of one feature's geometry, keyed by feature index.
#[derive(Debug, Clone)]
pub(super) struct BoundingBox {
    idx: usize,
    envelope: AABB<[f64; 2]>,
}

impl BoundingBox {
    /// Envelope of the geometry at feature `idx`, or `None` for an empty geometry.
    pub(super) fn of(idx: usize, geometry: &Geometry<f64>) -> Option<Self> {
        let rect = geometry.bounding_rect()?;
        Some(Self { idx, envelope: AABB::from_corners(rect.min().into(), rect.max().into()) })
    }

    #[inline] pub(super) fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope { self.envelope }
}

#[cfg(test)]
mod tests {
    use geo::{line_string, MultiPolygon};

    use super::*;

    #[test]
    fn envelope_spans_the_geometry() {
        let line: Geometry<f64> = line_string![(x: 3.0, y: -1.0), (x: -2.0, y: 4.0)].into();
        let bbox = BoundingBox::of(7, &line).unwrap();

        assert_eq!(bbox.idx(), 7);
        assert_eq!(bbox.envelope().lower(), [-2.0, -1.0]);
        assert_eq!(bbox.envelope().upper(), [3.0, 4.0]);
    }

    #[test]
    fn empty_geometry_has_no_box() {
        let empty: Geometry<f64> = MultiPolygon::<f64>::new(Vec::new()).into();
        assert!(BoundingBox::of(0, &empty).is_none());
    }
}
