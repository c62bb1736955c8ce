use anyhow::Result;
use boundary_clip::ClipConfig;

use crate::cli::Cli;

pub fn run(cli: &Cli) -> Result<()> {
    let config = ClipConfig::chicago(&cli.data_dir).with_verbose(cli.verbose);

    if cli.verbose > 0 {
        eprintln!("[clip] data_dir={}", cli.data_dir.display());
    }

    let reports = boundary_clip::run(&config)?;

    if cli.verbose > 1 {
        for report in &reports {
            eprintln!("[clip] {}: kept {} of {} ({} removed)",
                report.label, report.clipped, report.original, report.removed());
        }
    }

    Ok(())
}
