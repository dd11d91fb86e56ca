#![no_main]

use cellprof_pipeline::platemap::{BarcodeTable, PlateIdentifier};
use cellprof_pipeline::table::{Delimiter, Table};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Malformed tables must fail with an error, never panic
    for delimiter in [Delimiter::Comma, Delimiter::Tab] {
        if let Ok(table) = Table::from_reader(Cursor::new(data), delimiter) {
            let mut out = Vec::new();
            let _ = table.write_to(&mut out, delimiter);
            if let Some(first) = table.headers().first() {
                let _ = table.merge(&table, first, first);
            }
        }
    }

    if let Ok(barcodes) = BarcodeTable::from_reader(Cursor::new(data)) {
        let _ = barcodes.duplicate_barcodes();
        for entry in barcodes.entries().iter().take(16) {
            if let Ok(plate) = PlateIdentifier::new(entry.assay_plate_barcode.as_str()) {
                let _ = barcodes.lookup(&plate);
            }
        }
    }
});
