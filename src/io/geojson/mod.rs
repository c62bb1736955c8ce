mod format;
mod geometry;
mod read;
mod write;

pub(crate) use format::IndentZeroFormatter;
pub use read::{read_from_geojson_bytes, read_geojson_file};
pub use write::{to_geojson_value, write_geojson_file, write_to_geojson_bytes};
