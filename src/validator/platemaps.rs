use std::collections::HashSet;
use std::path::Path;

use crate::platemap::{load_platemap, platemap_path, BarcodeTable, PLATEMAP_EXTENSION, PLATEMAP_SUBDIR};
use crate::table::Table;

use super::{ValidationCheck, ValidationReport, WELL_COLUMNS};

/// Step 3: every platemap the barcode table points at
pub(crate) fn check_platemaps(table: &BarcodeTable, metadata_dir: &Path, report: &mut ValidationReport) {
    let names = table.platemap_names();

    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| !platemap_path(metadata_dir, name).is_file())
        .collect();
    if missing.is_empty() {
        report.add_check(ValidationCheck::ok("Referenced platemaps exist"));
    } else {
        report.add_check(ValidationCheck::failed(
            "Referenced platemaps exist",
            format!("Missing platemap file(s): {}", missing.join(", ")),
        ));
    }

    for name in names.iter().filter(|n| !missing.contains(*n)) {
        let check_name = format!("Platemap {name}");
        match load_platemap(platemap_path(metadata_dir, name)) {
            Ok(platemap) => report.add_check(check_well_column(check_name, &platemap)),
            Err(e) => report.add_check(ValidationCheck::failed(check_name, e.to_string())),
        }
    }

    check_unreferenced(&names, metadata_dir, report);
}

fn check_well_column(check_name: String, platemap: &Table) -> ValidationCheck {
    let Some(column) = WELL_COLUMNS.into_iter().find(|c| platemap.has_column(c)) else {
        return ValidationCheck::warning(
            check_name,
            format!("No well column (expected one of {})", WELL_COLUMNS.join(", ")),
        );
    };

    let mut seen = HashSet::new();
    let mut repeated: Vec<&str> = Vec::new();
    // The column was found above
    if let Ok(wells) = platemap.column(column) {
        for well in wells {
            if !seen.insert(well) && !repeated.contains(&well) {
                repeated.push(well);
            }
        }
    }

    if repeated.is_empty() {
        ValidationCheck::ok(format!("{check_name} ({} wells)", platemap.row_count()))
    } else {
        ValidationCheck::warning(
            check_name,
            format!("Wells listed more than once in {}: {}", column, repeated.join(", ")),
        )
    }
}

fn check_unreferenced(names: &[&str], metadata_dir: &Path, report: &mut ValidationReport) {
    let Ok(entries) = std::fs::read_dir(metadata_dir.join(PLATEMAP_SUBDIR)) else {
        return;
    };

    let mut unreferenced: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().and_then(|e| e.to_str()) == Some(PLATEMAP_EXTENSION)
        })
        .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .filter(|stem| !names.contains(&stem.as_str()))
        .collect();
    unreferenced.sort();

    if unreferenced.is_empty() {
        report.add_check(ValidationCheck::ok("Every platemap file is referenced"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Every platemap file is referenced",
            format!("Not used by any barcode: {}", unreferenced.join(", ")),
        ));
    }
}
