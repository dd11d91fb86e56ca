use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use cellprof_pipeline::platemap::PlatemapResolver;
use cellprof_pipeline::steps::merge_cell_counts;
use cellprof_pipeline::table::{Delimiter, Table};

/// Join a cell-count table with the platemap of the plate it was counted on
pub fn run(
    counts: PathBuf,
    data_file: PathBuf,
    barcodes: PathBuf,
    metadata: PathBuf,
    output: PathBuf,
) -> Result<()> {
    let resolver = PlatemapResolver::new(barcodes, metadata);
    let (plate, platemap) = resolver
        .resolve_for_file(&data_file)
        .with_context(|| format!("Failed to resolve platemap for {}", data_file.display()))?;

    let count_table = Table::from_path(&counts, Delimiter::from_path(&counts))
        .with_context(|| format!("Failed to read cell counts {}", counts.display()))?;

    let merged = merge_cell_counts(&count_table, &platemap.table)?;
    merged
        .to_path(&output, Delimiter::Tab)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Plate {}: {} wells joined with platemap {} -> {}",
        plate,
        merged.row_count(),
        platemap.name,
        output.display()
    );
    Ok(())
}
