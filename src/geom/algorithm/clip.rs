use geo::{
    BooleanOps, CoordsIter, Geometry, GeometryCollection, Intersects, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Relate,
};

use crate::geom::geom::polygonal_parts;

/// Clip a geometry to the boundary, keeping only the part that lies inside it.
/// Returns `None` when nothing remains. Geometries already contained in the boundary
/// are returned as-is so their coordinates are untouched. Shapes that only touch the
/// boundary keep their shared edges or points.
pub fn clip_geometry(geometry: &Geometry<f64>, boundary: &MultiPolygon<f64>) -> Option<Geometry<f64>> {
    if geometry.coords_count() == 0 || boundary.0.is_empty() { return None }

    match geometry {
        Geometry::Point(point) => boundary.intersects(point).then(|| geometry.clone()),
        Geometry::MultiPoint(points) => {
            let kept = points.iter()
                .filter(|point| boundary.intersects(*point))
                .copied()
                .collect::<Vec<_>>();
            (!kept.is_empty()).then(|| MultiPoint::new(kept).into())
        }
        Geometry::GeometryCollection(collection) => {
            let kept = collection.iter()
                .filter_map(|member| clip_geometry(member, boundary))
                .collect::<Vec<_>>();
            (!kept.is_empty()).then(|| Geometry::GeometryCollection(GeometryCollection::new_from(kept)))
        }
        _ if boundary.relate(geometry).is_contains() => Some(geometry.clone()),
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
            let areal = MultiPolygon::new(polygonal_parts(geometry));
            polygonal(boundary.intersection(&areal)).or_else(|| touching(geometry, boundary))
        }
        Geometry::LineString(line) => lineal(boundary.clip(&MultiLineString::new(vec![line.clone()]), false))
            .or_else(|| touching(geometry, boundary)),
        Geometry::MultiLineString(lines) => lineal(boundary.clip(lines, false))
            .or_else(|| touching(geometry, boundary)),
        Geometry::Line(line) => {
            let line = LineString::from(vec![line.start, line.end]);
            lineal(boundary.clip(&MultiLineString::new(vec![line]), false))
                .or_else(|| touching(geometry, boundary))
        }
    }
}

/// Intersection of a shape that meets the boundary without overlapping its interior:
/// the shared edge segments if there are any, otherwise the shared points.
fn touching(geometry: &Geometry<f64>, boundary: &MultiPolygon<f64>) -> Option<Geometry<f64>> {
    if !boundary.intersects(geometry) { return None }

    let edges = polygonal_parts(geometry).into_iter()
        .flat_map(|polygon| {
            let (exterior, interiors) = polygon.into_inner();
            std::iter::once(exterior).chain(interiors)
        })
        .collect::<Vec<_>>();
    if !edges.is_empty() {
        if let Some(shared) = lineal(boundary.clip(&MultiLineString::new(edges), false)) {
            return Some(shared);
        }
    }

    let mut points = geometry.coords_iter()
        .chain(boundary.coords_iter())
        .map(Point::from)
        .filter(|point| geometry.intersects(point) && boundary.intersects(point))
        .collect::<Vec<_>>();
    points.sort_by(|a, b| a.x().total_cmp(&b.x()).then(a.y().total_cmp(&b.y())));
    points.dedup();

    match points.len() {
        0 => None,
        1 => points.pop().map(Geometry::Point),
        _ => Some(MultiPoint::new(points).into()),
    }
}

/// Collapse an intersection result: nothing, a single Polygon, or a MultiPolygon.
fn polygonal(mut result: MultiPolygon<f64>) -> Option<Geometry<f64>> {
    result.0.retain(|polygon| polygon.exterior().coords_count() > 0);
    match result.0.len() {
        0 => None,
        1 => result.0.pop().map(Geometry::Polygon),
        _ => Some(result.into()),
    }
}

/// Collapse a clipped line result: nothing, a single LineString, or a MultiLineString.
fn lineal(mut result: MultiLineString<f64>) -> Option<Geometry<f64>> {
    result.0.retain(|line| line.0.windows(2).any(|pair| pair[0] != pair[1]));
    match result.0.len() {
        0 => None,
        1 => result.0.pop().map(Geometry::LineString),
        _ => Some(result.into()),
    }
}
