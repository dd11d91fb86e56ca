use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod check;
mod config;
mod merge;
mod resolve;
mod validate;

pub use config::Config;

/// cellprof - Platemap resolution and step plumbing for morphological profiling
#[derive(Parser)]
#[command(name = "cellprof")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load default paths from a TOML settings file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Pipeline step whose configuration section is checked.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StepArg {
    /// single_cell_config
    Aggregate,
    /// annotate_configs
    Annotate,
    /// normalize_configs
    Normalize,
    /// feature_select_configs
    FeatureSelect,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the plate identifier derived from data file names
    PlateId {
        /// Data file paths
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Resolve a plate to its platemap and write the platemap
    Resolve {
        /// Plate identifier (assay plate barcode)
        #[arg(long, conflicts_with = "data_file", required_unless_present = "data_file")]
        plate: Option<String>,

        /// Data file to derive the plate identifier from
        #[arg(long, value_name = "FILE")]
        data_file: Option<PathBuf>,

        /// Barcode table
        #[arg(long, value_name = "CSV")]
        barcodes: Option<PathBuf>,

        /// Metadata directory containing platemap/
        #[arg(long, value_name = "DIR")]
        metadata: Option<PathBuf>,

        /// Output path (stdout when omitted; .tsv/.txt are written tab-separated)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Join per-well cell counts with the plate's platemap
    MergeCounts {
        /// Cell-count table (delimiter inferred from extension)
        #[arg(long, value_name = "FILE")]
        counts: PathBuf,

        /// Data file the counts came from, used to derive the plate
        #[arg(long, value_name = "FILE")]
        data_file: PathBuf,

        /// Barcode table
        #[arg(long, value_name = "CSV")]
        barcodes: Option<PathBuf>,

        /// Metadata directory containing platemap/
        #[arg(long, value_name = "DIR")]
        metadata: Option<PathBuf>,

        /// Tab-separated output path
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Validate a barcode table and metadata directory
    Validate {
        /// Barcode table
        #[arg(long, value_name = "CSV")]
        barcodes: Option<PathBuf>,

        /// Metadata directory containing platemap/
        #[arg(long, value_name = "DIR")]
        metadata: Option<PathBuf>,
    },

    /// Load and validate one step's configuration section
    CheckConfig {
        /// Step whose section is read
        #[arg(value_enum)]
        step: StepArg,

        /// Config file (YAML, or TOML by extension)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::PlateId { files } => resolve::run_plate_id(&files),
        Commands::Resolve {
            plate,
            data_file,
            barcodes,
            metadata,
            output,
        } => resolve::run(
            plate,
            data_file,
            settings.barcodes(barcodes)?,
            settings.metadata(metadata)?,
            output,
        ),
        Commands::MergeCounts {
            counts,
            data_file,
            barcodes,
            metadata,
            output,
        } => merge::run(
            counts,
            data_file,
            settings.barcodes(barcodes)?,
            settings.metadata(metadata)?,
            output,
        ),
        Commands::Validate { barcodes, metadata } => {
            validate::run(settings.barcodes(barcodes)?, settings.metadata(metadata)?)
        }
        Commands::CheckConfig { step, file } => check::run(step, file),
    }
}
