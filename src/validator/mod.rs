//! # Metadata Validation
//!
//! Checks a barcode table and metadata directory before a run, so that a plate that
//! cannot be resolved is reported up front instead of aborting a step halfway
//! through the pipeline.
//!
//! ## Checks
//!
//! 1. **Layout**: barcode table and `platemap/` directory exist
//! 2. **Barcode table**: required columns, no blank cells, no barcode on two rows
//! 3. **Platemaps**: every referenced platemap exists, loads, and has a well column
//!    without repeated wells; unreferenced platemap files are flagged
//!
//! ```rust,no_run
//! use cellprof_pipeline::validator::validate_metadata;
//! use std::path::Path;
//!
//! let report = validate_metadata(
//!     Path::new("inputs/barcode_platemap.csv"),
//!     Path::new("inputs/metadata"),
//! );
//! println!("{}", report);
//! ```

use std::path::Path;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

mod barcodes;
mod platemaps;
mod report;

use crate::platemap::PLATEMAP_SUBDIR;

/// Column names accepted as the well identifier of a platemap
pub const WELL_COLUMNS: [&str; 3] = ["well_position", "Metadata_Well", "Image_Metadata_Well"];

/// Run every check against a barcode table and metadata directory
pub fn validate_metadata(barcodes: &Path, metadata_dir: &Path) -> ValidationReport {
    let mut report = ValidationReport::new(
        barcodes.display().to_string(),
        metadata_dir.display().to_string(),
    );

    if !check_layout(barcodes, metadata_dir, &mut report) {
        return report;
    }

    let Some(table) = barcodes::check_barcode_table(barcodes, &mut report) else {
        return report;
    };

    platemaps::check_platemaps(&table, metadata_dir, &mut report);
    report
}

/// Step 1: files and directories the resolver expects
fn check_layout(barcodes: &Path, metadata_dir: &Path, report: &mut ValidationReport) -> bool {
    let mut ok = true;

    if barcodes.is_file() {
        report.add_check(ValidationCheck::ok("Barcode table exists"));
    } else {
        report.add_check(ValidationCheck::failed(
            "Barcode table exists",
            format!("No such file: {}", barcodes.display()),
        ));
        ok = false;
    }

    let platemap_dir = metadata_dir.join(PLATEMAP_SUBDIR);
    if platemap_dir.is_dir() {
        report.add_check(ValidationCheck::ok(format!("{PLATEMAP_SUBDIR}/ directory exists")));
    } else {
        report.add_check(ValidationCheck::failed(
            format!("{PLATEMAP_SUBDIR}/ directory exists"),
            format!("No such directory: {}", platemap_dir.display()),
        ));
        ok = false;
    }

    ok
}
