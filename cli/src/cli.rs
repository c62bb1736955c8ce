use std::path::PathBuf;

/// Clip the community area and census tract datasets to the city boundary
#[derive(clap::Parser, Debug)]
#[command(name = "clip-to-boundary", version, about)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding the boundary and the *-original datasets
    #[arg(long, default_value = boundary_clip::DEFAULT_DATA_DIR, value_hint = clap::ValueHint::DirPath)]
    pub data_dir: PathBuf,
}
