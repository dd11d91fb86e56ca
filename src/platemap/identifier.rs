use std::fmt;
use std::path::Path;

use super::PlatemapError;

/// Key used to find a plate in the barcode table.
///
/// Derived from a data file name by a single rule: take the file name, cut it at the
/// first `.`, then cut what is left at the first `_`. So `SQ00014613.sqlite`,
/// `SQ00014613_aggregate.csv.gz` and `SQ00014613_normalized.csv` all map to
/// `SQ00014613`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlateIdentifier(String);

impl PlateIdentifier {
    /// Wrap an explicit identifier; it must not be empty
    pub fn new(id: impl Into<String>) -> Result<Self, PlatemapError> {
        let id = id.into();
        if id.is_empty() {
            return Err(PlatemapError::InvalidIdentifier(
                "plate identifier is empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Extract the identifier from a data file path
    pub fn from_data_file<P: AsRef<Path>>(path: P) -> Result<Self, PlatemapError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PlatemapError::InvalidIdentifier(format!(
                    "no usable file name in {}",
                    path.display()
                ))
            })?;

        let stem = name.split('.').next().unwrap_or_default();
        let id = stem.split('_').next().unwrap_or_default();

        if id.is_empty() {
            return Err(PlatemapError::InvalidIdentifier(format!(
                "no plate identifier in file name {name:?}"
            )));
        }
        Ok(Self(id.to_string()))
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlateIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlateIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for PlateIdentifier {
    type Err = PlatemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
