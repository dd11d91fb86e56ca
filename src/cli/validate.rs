use anyhow::Result;
use std::path::PathBuf;

use cellprof_pipeline::validator::validate_metadata;

/// Validate metadata and print the report
pub fn run(barcodes: PathBuf, metadata: PathBuf) -> Result<()> {
    let report = validate_metadata(&barcodes, &metadata);
    println!("{}", report.format_colored());

    if report.has_failures() {
        anyhow::bail!(
            "Metadata validation failed with {} error(s)",
            report.failure_count()
        );
    }

    Ok(())
}
