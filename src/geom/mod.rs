mod algorithm;
mod bbox;
mod geom;

use bbox::BoundingBox;
pub use algorithm::clip::clip_geometry;
pub use geom::Geometries;
