use std::path::PathBuf;

use log::info;

use super::{ensure_parent, ProfilingBackend, StepError};
use crate::config::{AnnotateParams, ConfigSection};
use crate::platemap::{PlateIdentifier, PlatemapResolver};

/// Files read and written by the annotation step
#[derive(Debug, Clone)]
pub struct AnnotateFiles {
    /// Aggregated profiles of one plate
    pub profiles: PathBuf,
    /// Barcode table
    pub barcodes: PathBuf,
    /// Metadata directory containing `platemap/`
    pub metadata_dir: PathBuf,
    /// Annotated profiles
    pub output: PathBuf,
}

/// Outcome of the annotation step
#[derive(Debug, Clone)]
pub struct AnnotateReport {
    /// Plate the profiles belong to
    pub plate: PlateIdentifier,
    /// Platemap joined onto the profiles
    pub platemap: String,
    /// Wells described by the platemap
    pub platemap_rows: usize,
}

/// Join the plate's platemap onto its aggregated profiles
pub fn annotate<B: ProfilingBackend + ?Sized>(
    files: &AnnotateFiles,
    params: &AnnotateParams,
    backend: &mut B,
) -> Result<AnnotateReport, StepError> {
    params.validate()?;

    let resolver = PlatemapResolver::new(&files.barcodes, &files.metadata_dir);
    let (plate, platemap) = resolver.resolve_for_file(&files.profiles)?;
    info!(
        "Annotating plate {} with platemap {} ({} wells)",
        plate,
        platemap.name,
        platemap.table.row_count()
    );

    ensure_parent(&files.output)?;
    backend
        .annotate(&files.profiles, &platemap.table, params, &files.output)
        .map_err(StepError::backend("annotate"))?;

    Ok(AnnotateReport {
        plate,
        platemap_rows: platemap.table.row_count(),
        platemap: platemap.name,
    })
}
