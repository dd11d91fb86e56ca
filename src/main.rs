//! # cellprof
//!
//! Command-line companion to the profiling pipeline steps.
//!
//! ## Usage
//!
//! ```bash
//! # Which plate does a file belong to?
//! cellprof plate-id results/SQ00014613_aggregate.csv.gz
//!
//! # Print the platemap of a plate
//! cellprof resolve --plate SQ00014613 --barcodes inputs/barcode_platemap.csv --metadata inputs/metadata
//!
//! # Check metadata before a run
//! cellprof validate --barcodes inputs/barcode_platemap.csv --metadata inputs/metadata
//!
//! # Check a step config
//! cellprof check-config normalize configs/normalize_configs.yaml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
