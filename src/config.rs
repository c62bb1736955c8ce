use std::path::{Path, PathBuf};

/// Default location of the raw datasets, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data/raw";

/// One dataset to clip: read `input`, write the clipped result to `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub label: String,
}

impl ClipJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self { input: input.into(), output: output.into(), label: label.into() }
    }
}

/// Everything a clipping run needs: the boundary, the datasets, and how chatty to be.
#[derive(Debug, Clone)]
pub struct ClipConfig {
    pub boundary: PathBuf,
    /// Human-readable boundary name used in progress output.
    pub boundary_label: String,
    pub jobs: Vec<ClipJob>,
    /// Extra diagnostics on stderr when > 0.
    pub verbose: u8,
}

impl ClipConfig {
    pub fn new(boundary: impl Into<PathBuf>, boundary_label: impl Into<String>, jobs: Vec<ClipJob>) -> Self {
        Self { boundary: boundary.into(), boundary_label: boundary_label.into(), jobs, verbose: 0 }
    }

    /// Chicago community areas and census tracts, clipped to the city boundary.
    /// Inputs are always the `-original` files so reruns never clip clipped data.
    pub fn chicago(data_dir: &Path) -> Self {
        Self::new(
            data_dir.join("chi-boundary.geojson"),
            "Chicago boundary",
            vec![
                ClipJob::new(
                    data_dir.join("chi-comm-areas-original.geojson"),
                    data_dir.join("chi-comm-areas.geojson"),
                    "Community Areas",
                ),
                ClipJob::new(
                    data_dir.join("chi-tracts-filled-original.geojson"),
                    data_dir.join("chi-tracts-filled.geojson"),
                    "Census Tracts",
                ),
            ],
        )
    }

    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for ClipConfig {
    fn default() -> Self { Self::chicago(Path::new(DEFAULT_DATA_DIR)) }
}
