use anyhow::{Context, Result};
use log::info;
use std::io;
use std::path::PathBuf;

use cellprof_pipeline::platemap::{PlateIdentifier, PlatemapResolver};
use cellprof_pipeline::table::Delimiter;

/// Print the plate identifier of each data file
pub fn run_plate_id(files: &[PathBuf]) -> Result<()> {
    for file in files {
        let plate = PlateIdentifier::from_data_file(file)
            .with_context(|| format!("Cannot derive plate from {}", file.display()))?;
        if files.len() == 1 {
            println!("{plate}");
        } else {
            println!("{}\t{}", file.display(), plate);
        }
    }
    Ok(())
}

/// Resolve a plate and write its platemap
pub fn run(
    plate: Option<String>,
    data_file: Option<PathBuf>,
    barcodes: PathBuf,
    metadata: PathBuf,
    output: Option<PathBuf>,
) -> Result<()> {
    let plate = match (plate, data_file) {
        (Some(id), _) => PlateIdentifier::new(id)?,
        (None, Some(file)) => PlateIdentifier::from_data_file(&file)
            .with_context(|| format!("Cannot derive plate from {}", file.display()))?,
        (None, None) => anyhow::bail!("Either --plate or --data-file is required"),
    };

    let resolver = PlatemapResolver::new(barcodes, metadata);
    let platemap = resolver
        .resolve(&plate)
        .with_context(|| format!("Failed to resolve platemap for plate {plate}"))?;

    info!(
        "Plate {} -> platemap {} ({}, {} wells)",
        plate,
        platemap.name,
        platemap.path.display(),
        platemap.table.row_count()
    );

    match output {
        Some(path) => platemap
            .table
            .to_path(&path, Delimiter::from_path(&path))
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => platemap
            .table
            .write_to(io::stdout().lock(), Delimiter::Comma)
            .context("Failed to write platemap to stdout")?,
    }

    Ok(())
}
