mod cli;
mod commands;

use std::process::ExitCode;

use boundary_clip::ClipError;

use cli::Cli;

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    commands::clip::run(&cli)
}

/// Missing inputs go to stdout with a hint; anything else is an error on stderr.
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<ClipError>() {
        Some(missing @ ClipError::MissingInput { .. }) => {
            println!("  ERROR: {missing}");
            println!("  Please ensure the original unclipped files exist with -original suffix");
        }
        Some(missing) => println!("  ERROR: {missing}"),
        None => eprintln!("Error: {err:#}"),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}
