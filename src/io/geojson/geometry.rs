use anyhow::{anyhow, bail, Context, Result};
use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use serde_json::{json, Value};

/// Parse a GeoJSON geometry object into a geo::Geometry.
pub(super) fn geometry_from_json(value: &Value) -> Result<Geometry<f64>> {
    let kind = value.get("type").and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Geometry is missing its type"))?;

    if kind == "GeometryCollection" {
        let members = value.get("geometries")
            .ok_or_else(|| anyhow!("GeometryCollection is missing its geometries"))?;
        let geometries = as_array(members, "geometries")?.iter()
            .enumerate()
            .map(|(i, member)| geometry_from_json(member)
                .with_context(|| format!("Invalid member {i} of GeometryCollection")))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Geometry::GeometryCollection(GeometryCollection::new_from(geometries)));
    }

    let coords = value.get("coordinates")
        .ok_or_else(|| anyhow!("{kind} is missing its coordinates"))?;

    let geometry: Geometry<f64> = match kind {
        "Point" => Point(parse_coord(coords)?).into(),
        "MultiPoint" => MultiPoint::new(
            as_array(coords, kind)?.iter()
                .map(|c| parse_coord(c).map(Point))
                .collect::<Result<Vec<_>>>()?
        ).into(),
        "LineString" => parse_line(coords)?.into(),
        "MultiLineString" => MultiLineString::new(
            as_array(coords, kind)?.iter()
                .map(parse_line)
                .collect::<Result<Vec<_>>>()?
        ).into(),
        "Polygon" => parse_polygon(coords)?.into(),
        "MultiPolygon" => MultiPolygon::new(
            as_array(coords, kind)?.iter()
                .map(parse_polygon)
                .collect::<Result<Vec<_>>>()?
        ).into(),
        other => bail!("Unsupported geometry type: {other}"),
    };

    Ok(geometry)
}

/// Convert a geo::Geometry to a GeoJSON geometry object.
pub(super) fn geometry_to_json(geometry: &Geometry<f64>) -> Value {
    match geometry {
        Geometry::Point(point) => json!({
            "type": "Point",
            "coordinates": coord_to_json(point.0),
        }),
        Geometry::MultiPoint(points) => json!({
            "type": "MultiPoint",
            "coordinates": points.iter().map(|p| coord_to_json(p.0)).collect::<Vec<_>>(),
        }),
        Geometry::Line(line) => json!({
            "type": "LineString",
            "coordinates": [coord_to_json(line.start), coord_to_json(line.end)],
        }),
        Geometry::LineString(line) => json!({
            "type": "LineString",
            "coordinates": line_to_json(line),
        }),
        Geometry::MultiLineString(lines) => json!({
            "type": "MultiLineString",
            "coordinates": lines.iter().map(line_to_json).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(polygon) => json!({
            "type": "Polygon",
            "coordinates": polygon_to_json(polygon),
        }),
        Geometry::Rect(rect) => json!({
            "type": "Polygon",
            "coordinates": polygon_to_json(&rect.to_polygon()),
        }),
        Geometry::Triangle(triangle) => json!({
            "type": "Polygon",
            "coordinates": polygon_to_json(&triangle.to_polygon()),
        }),
        Geometry::MultiPolygon(polygons) => json!({
            "type": "MultiPolygon",
            "coordinates": polygons.iter().map(polygon_to_json).collect::<Vec<_>>(),
        }),
        Geometry::GeometryCollection(collection) => json!({
            "type": "GeometryCollection",
            "geometries": collection.iter().map(geometry_to_json).collect::<Vec<_>>(),
        }),
    }
}

#[inline]
fn coord_to_json(coord: Coord<f64>) -> Value {
    json!([coord.x, coord.y])
}

fn line_to_json(line: &LineString<f64>) -> Value {
    Value::Array(line.coords().map(|c| coord_to_json(*c)).collect())
}

/// Exterior ring first, then holes.
fn polygon_to_json(polygon: &Polygon<f64>) -> Value {
    Value::Array(
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .filter(|ring| !ring.0.is_empty())
            .map(line_to_json)
            .collect()
    )
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| anyhow!("Invalid {what}: expected an array"))
}

/// Parse a position `[x, y, ...]`; extra dimensions are ignored.
fn parse_coord(value: &Value) -> Result<Coord<f64>> {
    let position = as_array(value, "position")?;
    if position.len() < 2 {
        bail!("Invalid position: expected at least two numbers, found {}", position.len());
    }
    let x = position[0].as_f64()
        .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
    let y = position[1].as_f64()
        .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
    Ok(Coord { x, y })
}

fn parse_line(value: &Value) -> Result<LineString<f64>> {
    Ok(LineString(
        as_array(value, "line")?.iter()
            .map(parse_coord)
            .collect::<Result<Vec<_>>>()?
    ))
}

/// Parse polygon rings; `Polygon::new` closes any unclosed ring.
fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let mut rings = as_array(value, "polygon")?.iter()
        .map(parse_line)
        .collect::<Result<Vec<_>>>()?
        .into_iter();

    let exterior = rings.next().unwrap_or_else(|| LineString(Vec::new()));
    Ok(Polygon::new(exterior, rings.collect()))
}
