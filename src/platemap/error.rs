use std::path::PathBuf;

use crate::table::TableError;

/// Errors that can occur while resolving a plate to its platemap
#[derive(Debug, thiserror::Error)]
pub enum PlatemapError {
    /// I/O error reading the barcode table or a platemap
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error in the barcode table
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Barcode table lacks a required column
    #[error("Missing required barcode column: {0}")]
    MissingColumn(String),

    /// Platemap file could not be loaded as a table
    #[error("Invalid platemap {path}: {source}")]
    InvalidPlatemap {
        /// Platemap file that failed to load
        path: PathBuf,
        /// Underlying table error
        #[source]
        source: TableError,
    },

    /// Plate identifier is empty or could not be derived from a file name
    #[error("Invalid plate identifier: {0}")]
    InvalidIdentifier(String),

    /// No barcode row matches the plate identifier
    #[error("Plate {0} not found in barcode table")]
    PlateNotFound(String),

    /// More than one barcode row matches the plate identifier
    #[error("Plate {barcode} matches {} barcode rows (platemaps: {})", .platemaps.len(), .platemaps.join(", "))]
    AmbiguousPlate {
        /// The plate identifier that was looked up
        barcode: String,
        /// Platemap names of every matching row, in file order
        platemaps: Vec<String>,
    },

    /// Resolved platemap file does not exist
    #[error("Platemap file not found: {}", .0.display())]
    PlatemapFileNotFound(PathBuf),
}
