/// Errors that can occur while loading, writing or combining tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error reading or writing a table file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Temporary output file could not be moved into place
    #[error("Failed to persist output file: {0}")]
    PersistError(#[from] tempfile::PersistError),

    /// Table file has no header row
    #[error("Missing header row")]
    MissingHeader,

    /// Header row names the same column twice
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Column not present in the table
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Row width does not match the header width
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based data row index
        row: usize,
        /// Number of header columns
        expected: usize,
        /// Number of cells in the offending row
        found: usize,
    },
}
