#![doc = "Clip GeoJSON feature collections to a boundary polygon in WGS84"]
mod clip;
mod collection;
mod config;
mod crs;
mod error;
mod geom;
mod io;

#[doc(inline)]
pub use clip::{check_inputs, clip_job, run, Boundary, ClipReport};

#[doc(inline)]
pub use collection::{Feature, FeatureCollection, FeatureRef};

#[doc(inline)]
pub use config::{ClipConfig, ClipJob, DEFAULT_DATA_DIR};

#[doc(inline)]
pub use crs::{Crs, CrsMember, CRS84_URN};

#[doc(inline)]
pub use error::ClipError;

#[doc(inline)]
pub use geom::{clip_geometry, Geometries};

#[doc(inline)]
pub use io::geojson::{read_from_geojson_bytes, read_geojson_file, to_geojson_value, write_geojson_file, write_to_geojson_bytes};
