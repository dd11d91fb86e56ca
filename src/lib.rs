//! # cellprof-pipeline - Plate Metadata Plumbing for Morphological Profiling
//!
//! `cellprof_pipeline` is the glue between a workflow runner and a single-cell
//! morphological-profiling library. Each pipeline step takes a plate's data file,
//! finds the plate's platemap through a barcode lookup table, and hands the library
//! exactly the parameters written in the step's config file.
//!
//! ## Key Features
//!
//! - **Strict Platemap Resolution**: a plate must match exactly one barcode row.
//!   Missing and duplicated barcodes are errors, never a silent first match.
//!
//! - **One Plate-Identifier Rule**: every step derives the plate from a file name the
//!   same way (`SQ00014613.sqlite`, `SQ00014613_aggregate.csv.gz` → `SQ00014613`).
//!
//! - **Lossless Tables**: barcode tables and platemaps are kept as read, so a
//!   load followed by a write reproduces them cell for cell.
//!
//! - **Typed Step Configs**: YAML (or TOML) sections parsed into validated structs.
//!
//! - **Up-Front Validation**: a metadata directory can be checked before a run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cellprof_pipeline::platemap::resolve;
//!
//! let platemap = resolve(
//!     "SQ00014613",
//!     "inputs/barcode_platemap.csv",
//!     "inputs/metadata",
//! )?;
//! for well in platemap.column("well_position")? {
//!     println!("{well}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Metadata Layout
//!
//! ```text
//! inputs/
//! ├── barcode_platemap.csv      # Assay_Plate_Barcode,Plate_Map_Name
//! └── metadata/
//!     └── platemap/
//!         ├── C-7161-01-LM6-001.csv
//!         └── C-7161-01-LM6-002.csv
//! ```
//!
//! ## Architecture
//!
//! - [`table`]: delimited text tables, inner merge, column drops
//! - [`platemap`]: plate identifiers, barcode table, platemap resolution
//! - [`config`]: per-step configuration sections
//! - [`steps`]: aggregation, annotation, normalization, feature selection
//! - [`validator`]: metadata directory checks

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod platemap;
pub mod steps;
pub mod table;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{
        load_section, AggregateParams, AnnotateParams, ConfigError, ConfigSection,
        FeatureSelectParams, NormalizeMethod, NormalizeParams,
    };
    pub use crate::platemap::{
        platemap_path, resolve, BarcodeTable, PlateIdentifier, PlateMap, PlatemapError,
        PlatemapResolver,
    };
    pub use crate::steps::{
        aggregate, annotate, feature_select, normalize, merge_cell_counts, AggregateFiles,
        AnnotateFiles, ProfilingBackend, StepError,
    };
    pub use crate::table::{Delimiter, Table, TableError};
    pub use crate::validator::{validate_metadata, ValidationReport};
}
