use std::{path::Path, time::Instant};

use anyhow::{bail, Context, Result};
use geo::{BoundingRect, MultiPolygon};
use rstar::AABB;

use crate::collection::FeatureCollection;
use crate::config::{ClipConfig, ClipJob};
use crate::crs::CrsMember;
use crate::error::ClipError;
use crate::geom::clip_geometry;
use crate::io::geojson::{read_geojson_file, write_geojson_file};

/// The unioned boundary polygon, in WGS84, that datasets are clipped to.
#[derive(Debug, Clone)]
pub struct Boundary {
    shape: MultiPolygon<f64>,
    envelope: AABB<[f64; 2]>,
}

impl Boundary {
    /// Wrap an already-unioned WGS84 boundary shape. Errors if the shape is empty.
    pub fn new(shape: MultiPolygon<f64>) -> Result<Self> {
        let Some(rect) = shape.bounding_rect() else { bail!("Boundary contains no polygon geometry") };
        Ok(Self { envelope: AABB::from_corners(rect.min().into(), rect.max().into()), shape })
    }

    /// Build a boundary from every polygonal part of a collection, reprojecting to WGS84 first.
    pub fn from_collection(fc: &FeatureCollection) -> Result<Self> {
        let geoms = fc.geoms().reproject_to_wgs84()
            .with_context(|| format!("Failed to reproject boundary from {}", fc.crs()))?;
        Self::new(geoms.union())
    }

    /// Read a boundary from a GeoJSON file.
    pub fn read(path: &Path) -> Result<Self> {
        Self::from_collection(&read_geojson_file(path)?)
    }

    #[inline] pub fn shape(&self) -> &MultiPolygon<f64> { &self.shape }

    #[inline] pub fn envelope(&self) -> &AABB<[f64; 2]> { &self.envelope }

    /// Clip a WGS84 collection to the boundary.
    ///
    /// Features whose geometry misses the boundary (or is null) are dropped; the rest keep
    /// their id and properties with the clipped geometry, in input order. `name` is carried
    /// over as-is and an existing `crs` member is rewritten to CRS84, since the output
    /// coordinates are WGS84.
    pub fn clip(&self, fc: &FeatureCollection) -> Result<FeatureCollection> {
        if !fc.crs().is_wgs84() {
            bail!("Cannot clip a collection in {}; reproject it to EPSG:4326 first", fc.crs());
        }

        let geoms = fc.geoms();
        let picks = geoms.query_indices(&self.envelope).into_iter()
            .filter_map(|idx| Some((idx, clip_geometry(geoms.get(idx)?, &self.shape)?)))
            .collect();

        let clipped = fc.select(picks);
        match fc.crs_member() {
            Some(_) => Ok(clipped.with_crs_member(serde_json::to_value(CrsMember::crs84())?)),
            None => Ok(clipped),
        }
    }
}

/// Outcome of clipping one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipReport {
    pub label: String,
    pub original: usize,
    pub clipped: usize,
}

impl ClipReport {
    /// Number of features dropped by the clip.
    #[inline] pub fn removed(&self) -> usize { self.original.saturating_sub(self.clipped) }
}

/// Fail with a `ClipError` if the boundary or any job input is missing.
pub fn check_inputs(config: &ClipConfig) -> Result<()> {
    if !config.boundary.exists() {
        return Err(ClipError::MissingBoundary(config.boundary.clone()).into());
    }
    for job in &config.jobs {
        if !job.input.exists() {
            return Err(ClipError::MissingInput { label: job.label.clone(), path: job.input.clone() }.into());
        }
    }
    Ok(())
}

/// Clip every job in `config` to the boundary, in order, writing one output per job.
///
/// All inputs are checked up front, so a missing file aborts the run before any output
/// is written. Any other failure aborts at the job where it happens.
pub fn run(config: &ClipConfig) -> Result<Vec<ClipReport>> {
    check_inputs(config)?;

    if config.verbose > 0 {
        eprintln!("[clip] boundary={}", config.boundary.display());
        for job in &config.jobs {
            eprintln!("[clip] {}: {} -> {}", job.label, job.input.display(), job.output.display());
        }
    }

    println!("Loading {}...", config.boundary_label);
    let boundary = {
        let fc = read_geojson_file(&config.boundary)?;
        if !fc.crs().is_wgs84() {
            println!("Reprojecting boundary from {} to EPSG:4326...", fc.crs());
        }
        Boundary::from_collection(&fc)
            .with_context(|| format!("Invalid boundary: {}", config.boundary.display()))?
    };

    if config.verbose > 0 {
        let (lower, upper) = (boundary.envelope().lower(), boundary.envelope().upper());
        eprintln!("[clip] boundary has {} part(s), envelope [{}, {}] - [{}, {}]",
            boundary.shape().0.len(), lower[0], lower[1], upper[0], upper[1]);
    }

    let reports = config.jobs.iter()
        .map(|job| clip_job(job, &boundary, config))
        .collect::<Result<Vec<_>>>()?;

    println!("\n✓ Clipping complete!");
    println!("  Input: *-original.geojson files");
    println!("  Output: Clipped files without suffix");

    Ok(reports)
}

/// Load, reproject, clip and write a single dataset.
pub fn clip_job(job: &ClipJob, boundary: &Boundary, config: &ClipConfig) -> Result<ClipReport> {
    println!("\nProcessing {}...", job.label);

    if !job.input.exists() {
        return Err(ClipError::MissingInput { label: job.label.clone(), path: job.input.clone() }.into());
    }

    let started = Instant::now();

    println!("  Loading from: {}", file_name(&job.input));
    let fc = read_geojson_file(&job.input)?;
    let original = fc.len();
    println!("  Original features: {original}");

    let fc = if fc.crs().is_wgs84() { fc } else {
        println!("  Reprojecting from {} to EPSG:4326...", fc.crs());
        fc.to_wgs84()?
    };

    println!("  Clipping to {}...", config.boundary_label);
    let clipped = boundary.clip(&fc)
        .with_context(|| format!("Failed to clip {}", job.label))?;
    let report = ClipReport { label: job.label.clone(), original, clipped: clipped.len() };
    println!("  Clipped features: {}", report.clipped);

    println!("  Saving clipped version to {}...", file_name(&job.output));
    write_geojson_file(&job.output, &clipped)?;
    println!("  ✓ Saved {} features (removed {})", report.clipped, report.removed());

    if config.verbose > 0 {
        eprintln!("[clip] {} finished in {:.2?}", job.label, started.elapsed());
    }

    Ok(report)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
