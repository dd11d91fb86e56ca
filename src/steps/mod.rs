//! # Pipeline Steps
//!
//! The four per-plate steps of a profiling run, as plain functions. Every path and
//! parameter arrives as an argument; nothing is read from an ambient workflow
//! context. The numerical work (SQL extraction, aggregation, normalization,
//! feature selection) belongs to the profiling library, reached through
//! [`ProfilingBackend`]. What the steps own is the plumbing around it: deriving the
//! plate from a file name, resolving its platemap, joining cell counts onto the
//! platemap, and pairing inputs with outputs.
//!
//! ```text
//! SQ00014613.sqlite ──aggregate──▶ SQ00014613_aggregate.csv.gz ──annotate──▶ ...
//!          │                      SQ00014613_cell_counts.tsv
//!          └── barcode table ──▶ metadata/platemap/<name>.csv
//! ```

mod aggregate;
mod annotate;
mod error;
mod feature_select;
mod normalize;

#[cfg(test)]
mod tests;

pub use aggregate::{
    aggregate, merge_cell_counts, AggregateFiles, AggregateReport, COUNT_WELL_COLUMN,
    PLATEMAP_DROP_COLUMNS, PLATEMAP_WELL_COLUMN,
};
pub use annotate::{annotate, AnnotateFiles, AnnotateReport};
pub use error::{BackendError, StepError};
pub use feature_select::feature_select;
pub use normalize::normalize;

use std::path::{Path, PathBuf};

use crate::config::{AggregateParams, AnnotateParams, FeatureSelectParams, NormalizeParams};
use crate::table::Table;

/// Operations of the external profiling library the steps delegate to
pub trait ProfilingBackend {
    /// Count cells per well in a single-cell SQLite file
    fn count_cells(&mut self, sql_file: &Path, params: &AggregateParams)
        -> Result<Table, BackendError>;

    /// Aggregate single cells into well-level profiles written to `output`
    fn aggregate_profiles(
        &mut self,
        sql_file: &Path,
        params: &AggregateParams,
        output: &Path,
    ) -> Result<(), BackendError>;

    /// Join the platemap onto aggregated profiles and write them to `output`
    fn annotate(
        &mut self,
        profiles: &Path,
        platemap: &Table,
        params: &AnnotateParams,
        output: &Path,
    ) -> Result<(), BackendError>;

    /// Normalize annotated profiles into `output`
    fn normalize(
        &mut self,
        profiles: &Path,
        params: &NormalizeParams,
        output: &Path,
    ) -> Result<(), BackendError>;

    /// Select features from normalized profiles into `output`
    fn feature_select(
        &mut self,
        profiles: &Path,
        params: &FeatureSelectParams,
        output: &Path,
    ) -> Result<(), BackendError>;
}

/// Files handled by a batch step (normalization or feature selection)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Input/output pairs, in processing order
    pub processed: Vec<(PathBuf, PathBuf)>,
}

impl BatchReport {
    /// Number of files processed
    pub fn len(&self) -> usize {
        self.processed.len()
    }

    /// True when no file was processed
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }
}

/// Pair each input with its output; the lists must be the same length
pub(crate) fn pair_files<'a>(
    inputs: &'a [PathBuf],
    outputs: &'a [PathBuf],
) -> Result<impl Iterator<Item = (&'a PathBuf, &'a PathBuf)>, StepError> {
    if inputs.len() != outputs.len() {
        return Err(StepError::MismatchedOutputs {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }
    Ok(inputs.iter().zip(outputs.iter()))
}

/// Create the directory an output file will be written into
pub(crate) fn ensure_parent(path: &Path) -> Result<(), StepError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
