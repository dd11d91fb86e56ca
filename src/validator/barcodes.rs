use std::path::Path;

use crate::platemap::{BarcodeTable, BARCODE_COLUMN, PLATEMAP_NAME_COLUMN};

use super::{ValidationCheck, ValidationReport};

/// Step 2: barcode table contents
pub(crate) fn check_barcode_table(path: &Path, report: &mut ValidationReport) -> Option<BarcodeTable> {
    let table = match BarcodeTable::from_path(path) {
        Ok(table) => table,
        Err(e) => {
            report.add_check(ValidationCheck::failed("Barcode table parses", e.to_string()));
            return None;
        }
    };

    if table.is_empty() {
        report.add_check(ValidationCheck::warning(
            "Barcode table parses",
            "Barcode table has no plates",
        ));
        return Some(table);
    }
    report.add_check(ValidationCheck::ok(format!(
        "Barcode table parses ({} plates, {} platemaps)",
        table.len(),
        table.platemap_names().len()
    )));

    let blank_rows: Vec<String> = table
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.assay_plate_barcode.is_empty() || e.plate_map_name.is_empty())
        .map(|(i, _)| (i + 2).to_string())
        .collect();
    if blank_rows.is_empty() {
        report.add_check(ValidationCheck::ok("No blank barcode cells"));
    } else {
        report.add_check(ValidationCheck::failed(
            "No blank barcode cells",
            format!(
                "Empty {} or {} on line(s) {}",
                BARCODE_COLUMN,
                PLATEMAP_NAME_COLUMN,
                blank_rows.join(", ")
            ),
        ));
    }

    let duplicates = table.duplicate_barcodes();
    if duplicates.is_empty() {
        report.add_check(ValidationCheck::ok("Barcodes are unique"));
    } else {
        let listed: Vec<String> = duplicates
            .iter()
            .map(|(barcode, names)| format!("{} -> [{}]", barcode, names.join(", ")))
            .collect();
        report.add_check(ValidationCheck::failed(
            "Barcodes are unique",
            format!("Ambiguous barcodes: {}", listed.join("; ")),
        ));
    }

    Some(table)
}
