//! heatmark - track activity records and render them as a contribution heatmap.

pub mod cli;
pub mod config;
pub mod error;
pub mod heatmap;
pub mod journal;
pub mod logging;
pub mod record;
pub mod runtime;

use clap::Parser;
use cli::Cli;
use color_eyre::eyre::Result;

/// Main entry point - parses CLI args and runs the requested command.
///
/// Installs error reporting and logging before dispatching, so anything the
/// command logs goes to stderr filtered by `HEATMARK_LOG`.
pub fn run_cli() -> Result<()> {
    color_eyre::install()?;
    logging::init();
    let cli = Cli::parse();
    runtime::run(cli)?;
    Ok(())
}
