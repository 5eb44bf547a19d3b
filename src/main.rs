//! # clusterprep command-line entry point
//!
//! ```bash
//! clusterprep clean --data cohort.csv --types cohort_types.csv --target CDCOMMUN
//! RUST_LOG=debug clusterprep --log-dir logs clean -d cohort.csv -t cohort_types.csv
//! ```
//!
//! The cleaned table stays in memory; the command prints a JSON summary of it (row and
//! column counts, column groups, target classes, warnings). Export formats are the job of
//! downstream tools.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    clusterprep::logging::init(cli.log_dir.as_deref())?;
    cli::run_command(cli.command)
}
