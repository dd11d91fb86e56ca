use std::path::PathBuf;

use log::{info, warn};

use super::{ensure_parent, ProfilingBackend, StepError};
use crate::config::{AggregateParams, ConfigSection};
use crate::platemap::{PlateIdentifier, PlatemapResolver};
use crate::table::{Delimiter, Table};

/// Well column of the cell-count table produced by the profiling library
pub const COUNT_WELL_COLUMN: &str = "Image_Metadata_Well";

/// Well column of platemap files
pub const PLATEMAP_WELL_COLUMN: &str = "well_position";

/// Platemap layout columns removed from the merged cell counts
pub const PLATEMAP_DROP_COLUMNS: [&str; 3] = ["WellRow", "WellCol", PLATEMAP_WELL_COLUMN];

/// Files read and written by the aggregation step
#[derive(Debug, Clone)]
pub struct AggregateFiles {
    /// Single-cell SQLite file of one plate
    pub sql_file: PathBuf,
    /// Barcode table
    pub barcodes: PathBuf,
    /// Metadata directory containing `platemap/`
    pub metadata_dir: PathBuf,
    /// Tab-separated per-well cell counts joined with the platemap
    pub cell_counts_out: PathBuf,
    /// Aggregated profiles
    pub aggregate_out: PathBuf,
}

/// Outcome of the aggregation step
#[derive(Debug, Clone)]
pub struct AggregateReport {
    /// Plate the SQLite file belongs to
    pub plate: PlateIdentifier,
    /// Platemap used for the cell counts
    pub platemap: String,
    /// Wells written to the cell-count file
    pub cell_count_rows: usize,
}

/// Join per-well cell counts with the platemap.
///
/// Inner join of `COUNT_WELL_COLUMN` against `PLATEMAP_WELL_COLUMN`, after which the
/// platemap layout columns are removed. `WellRow`/`WellCol` are optional in platemaps
/// and skipped when absent.
pub fn merge_cell_counts(counts: &Table, platemap: &Table) -> Result<Table, StepError> {
    let mut merged = counts.merge(platemap, COUNT_WELL_COLUMN, PLATEMAP_WELL_COLUMN)?;

    let present: Vec<&str> = PLATEMAP_DROP_COLUMNS
        .into_iter()
        .filter(|c| {
            let found = merged.has_column(c);
            if !found {
                warn!("Platemap has no {} column; nothing to drop", c);
            }
            found
        })
        .collect();
    merged.drop_columns(&present)?;

    if merged.row_count() < counts.row_count() {
        warn!(
            "{} of {} counted wells have no platemap entry",
            counts.row_count() - merged.row_count(),
            counts.row_count()
        );
    }
    Ok(merged)
}

/// Count cells per well, write the counts joined with the platemap, then aggregate
/// single cells into well profiles.
pub fn aggregate<B: ProfilingBackend + ?Sized>(
    files: &AggregateFiles,
    params: &AggregateParams,
    backend: &mut B,
) -> Result<AggregateReport, StepError> {
    params.validate()?;

    let resolver = PlatemapResolver::new(&files.barcodes, &files.metadata_dir);
    let (plate, platemap) = resolver.resolve_for_file(&files.sql_file)?;
    info!("Plate {} uses platemap {}", plate, platemap.name);

    info!("Counting cells within each well");
    let counts = backend
        .count_cells(&files.sql_file, params)
        .map_err(StepError::backend("count_cells"))?;

    let cell_counts = merge_cell_counts(&counts, &platemap.table)?;
    info!("Saving cell counts in: {}", files.cell_counts_out.display());
    ensure_parent(&files.cell_counts_out)?;
    cell_counts.to_path(&files.cell_counts_out, Delimiter::Tab)?;

    info!("Aggregating cells into {}", files.aggregate_out.display());
    ensure_parent(&files.aggregate_out)?;
    backend
        .aggregate_profiles(&files.sql_file, params, &files.aggregate_out)
        .map_err(StepError::backend("aggregate_profiles"))?;

    Ok(AggregateReport {
        plate,
        platemap: platemap.name,
        cell_count_rows: cell_counts.row_count(),
    })
}
