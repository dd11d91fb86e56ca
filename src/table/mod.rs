//! # Delimited Text Tables
//!
//! Barcode tables, platemaps and cell-count outputs are all small delimited text
//! files with a header row. [`Table`] holds one of them fully in memory as strings,
//! exactly as read: no type inference, no trimming, no index column. That keeps a
//! load followed by a write lossless, which downstream joins depend on.
//!
//! The only relational operations the pipeline needs are an inner [`Table::merge`]
//! on one key column per side and [`Table::drop_columns`].

mod error;

#[cfg(test)]
mod tests;

pub use error::TableError;

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::debug;

/// Suffix appended to a left-hand column whose name also appears on the right of a merge
pub const LEFT_SUFFIX: &str = "_x";

/// Suffix appended to a right-hand column whose name also appears on the left of a merge
pub const RIGHT_SUFFIX: &str = "_y";

/// Field delimiter of a table file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Comma-separated values
    #[default]
    Comma,
    /// Tab-separated values
    Tab,
}

impl Delimiter {
    /// The delimiter as a single byte, as the csv crate expects it
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }

    /// Infer the delimiter from a file extension (`.tsv` and `.txt` are tab-separated)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("txt") => Delimiter::Tab,
            _ => Delimiter::Comma,
        }
    }
}

/// An in-memory table of string cells with named columns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given column names
    pub fn new<I, S>(headers: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(headers.len());
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(TableError::DuplicateColumn(header.clone()));
            }
        }
        Ok(Self {
            headers,
            rows: Vec::new(),
        })
    }

    /// Append a row; it must have one cell per column
    pub fn push_row<I, S>(&mut self, cells: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        if row.len() != self.headers.len() {
            return Err(TableError::RaggedRow {
                row: self.rows.len(),
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Load a table from a file
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: Delimiter) -> Result<Self, TableError> {
        let path = path.as_ref();
        debug!("Loading table {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), delimiter)
    }

    /// Load a table from a reader; the first record is the header row
    pub fn from_reader<R: Read>(reader: R, delimiter: Delimiter) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() {
            return Err(TableError::MissingHeader);
        }
        let mut table = Table::new(headers.iter())?;

        for record in csv_reader.records() {
            table.push_row(record?.iter())?;
        }

        Ok(table)
    }

    /// Column names in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All data rows in file order
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (the header is not counted)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// True when the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// Position of a column
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// Values of one column, top to bottom
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &str> + '_, TableError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Cell at `row` in column `name`, if both exist
    pub fn get(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name).ok()?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Serialize the table, header first
    pub fn write_to<W: Write>(&self, writer: W, delimiter: Delimiter) -> Result<(), TableError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter.as_byte())
            .from_writer(writer);

        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the table to `path`, replacing any existing file only once the write succeeded
    pub fn to_path<P: AsRef<Path>>(&self, path: P, delimiter: Delimiter) -> Result<(), TableError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        self.write_to(&mut tmp, delimiter)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;

        debug!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Inner join with `right`, matching `left_on` here against `right_on` there.
    ///
    /// Rows come out in left order, each followed by its right matches in right order.
    /// Columns are all left columns then all right columns. A non-key name present on
    /// both sides is suffixed with [`LEFT_SUFFIX`] / [`RIGHT_SUFFIX`]. When both key
    /// columns share a name, the key is emitted once.
    pub fn merge(&self, right: &Table, left_on: &str, right_on: &str) -> Result<Table, TableError> {
        let left_key = self.column_index(left_on)?;
        let right_key = right.column_index(right_on)?;
        let shared_key = left_on == right_on;

        let right_cols: Vec<usize> = (0..right.headers.len())
            .filter(|&i| !(shared_key && i == right_key))
            .collect();

        let left_names: HashSet<&str> = self
            .headers
            .iter()
            .enumerate()
            .filter(|&(i, _)| !(shared_key && i == left_key))
            .map(|(_, h)| h.as_str())
            .collect();
        let right_names: HashSet<&str> = right_cols
            .iter()
            .map(|&i| right.headers[i].as_str())
            .collect();

        let mut headers = Vec::with_capacity(self.headers.len() + right_cols.len());
        for (i, h) in self.headers.iter().enumerate() {
            if !(shared_key && i == left_key) && right_names.contains(h.as_str()) {
                headers.push(format!("{h}{LEFT_SUFFIX}"));
            } else {
                headers.push(h.clone());
            }
        }
        for &i in &right_cols {
            let h = &right.headers[i];
            if left_names.contains(h.as_str()) {
                headers.push(format!("{h}{RIGHT_SUFFIX}"));
            } else {
                headers.push(h.clone());
            }
        }

        let mut by_key: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, row) in right.rows.iter().enumerate() {
            by_key.entry(row[right_key].as_str()).or_default().push(idx);
        }

        let mut merged = Table::new(headers)?;
        for left_row in &self.rows {
            let Some(matches) = by_key.get(left_row[left_key].as_str()) else {
                continue;
            };
            for &m in matches {
                let right_row = &right.rows[m];
                let mut row = left_row.clone();
                row.extend(right_cols.iter().map(|&i| right_row[i].clone()));
                merged.rows.push(row);
            }
        }

        debug!(
            "Merged {} x {} rows on {}={} -> {} rows",
            self.rows.len(),
            right.rows.len(),
            left_on,
            right_on,
            merged.rows.len()
        );
        Ok(merged)
    }

    /// Remove the named columns; fails without modifying the table if any is absent
    pub fn drop_columns(&mut self, names: &[&str]) -> Result<(), TableError> {
        let mut doomed = Vec::with_capacity(names.len());
        for name in names {
            doomed.push(self.column_index(name)?);
        }

        let keep: Vec<usize> = (0..self.headers.len())
            .filter(|i| !doomed.contains(i))
            .collect();

        self.headers = keep.iter().map(|&i| self.headers[i].clone()).collect();
        for row in &mut self.rows {
            let kept: Vec<String> = keep.iter().map(|&i| std::mem::take(&mut row[i])).collect();
            *row = kept;
        }
        Ok(())
    }
}
