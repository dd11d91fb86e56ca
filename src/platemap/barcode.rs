use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{PlateIdentifier, PlatemapError};

/// Barcode column of the barcode table
pub const BARCODE_COLUMN: &str = "Assay_Plate_Barcode";

/// Platemap name column of the barcode table
pub const PLATEMAP_NAME_COLUMN: &str = "Plate_Map_Name";

/// One row of the barcode table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeEntry {
    /// Assay plate barcode, unique per physical plate
    pub assay_plate_barcode: String,
    /// Name of the platemap file (without extension) describing the plate layout
    pub plate_map_name: String,
}

/// Lookup table from assay plate barcode to platemap name
#[derive(Debug, Clone, Default)]
pub struct BarcodeTable {
    entries: Vec<BarcodeEntry>,
}

impl BarcodeTable {
    /// Build a table from entries, keeping their order
    pub fn new(entries: Vec<BarcodeEntry>) -> Self {
        Self { entries }
    }

    /// Parse a comma-separated barcode table file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PlatemapError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a comma-separated barcode table; other columns are ignored
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PlatemapError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| PlatemapError::MissingColumn(name.to_string()))
        };
        let barcode_idx = position(BARCODE_COLUMN)?;
        let name_idx = position(PLATEMAP_NAME_COLUMN)?;

        let mut entries = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            // Field presence is guaranteed: the reader is not flexible
            entries.push(BarcodeEntry {
                assay_plate_barcode: record[barcode_idx].to_string(),
                plate_map_name: record[name_idx].to_string(),
            });
        }

        Ok(Self { entries })
    }

    /// All rows in file order
    pub fn entries(&self) -> &[BarcodeEntry] {
        &self.entries
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Platemap name for a plate; exactly one row must match
    pub fn lookup(&self, plate: &PlateIdentifier) -> Result<&str, PlatemapError> {
        let mut matches = self
            .entries
            .iter()
            .filter(|e| e.assay_plate_barcode == plate.as_str());

        let first = matches
            .next()
            .ok_or_else(|| PlatemapError::PlateNotFound(plate.to_string()))?;

        let rest: Vec<&BarcodeEntry> = matches.collect();
        if !rest.is_empty() {
            let platemaps = std::iter::once(first)
                .chain(rest)
                .map(|e| e.plate_map_name.clone())
                .collect();
            return Err(PlatemapError::AmbiguousPlate {
                barcode: plate.to_string(),
                platemaps,
            });
        }

        Ok(&first.plate_map_name)
    }

    /// Distinct platemap names in order of first appearance
    pub fn platemap_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !names.contains(&entry.plate_map_name.as_str()) {
                names.push(&entry.plate_map_name);
            }
        }
        names
    }

    /// Barcodes that occur on more than one row, with their platemap names
    pub fn duplicate_barcodes(&self) -> Vec<(&str, Vec<&str>)> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<&str>> = HashMap::new();
        for entry in &self.entries {
            let group = groups.entry(&entry.assay_plate_barcode).or_insert_with(|| {
                order.push(&entry.assay_plate_barcode);
                Vec::new()
            });
            group.push(&entry.plate_map_name);
        }

        order
            .into_iter()
            .filter_map(|barcode| {
                let names = groups.remove(barcode)?;
                (names.len() > 1).then_some((barcode, names))
            })
            .collect()
    }
}
