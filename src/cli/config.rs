//! TOML settings file for the `cellprof` binary.
//!
//! Saves repeating the metadata locations on every invocation:
//!
//! ```toml
//! # cellprof.toml
//! [paths]
//! barcodes = "inputs/barcode_platemap.csv"
//! metadata = "inputs/metadata"
//! ```
//!
//! Relative paths are taken relative to the settings file. Command-line flags win
//! over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root of a cellprof.toml file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Metadata locations.
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Default inputs for platemap resolution.
#[derive(Debug, Default, Deserialize)]
pub struct PathsConfig {
    /// Barcode table.
    pub barcodes: Option<PathBuf>,

    /// Metadata directory containing `platemap/`.
    pub metadata: Option<PathBuf>,
}

impl Config {
    /// Load settings from a TOML file, anchoring relative paths at its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::from_str(&content)?;
        if let Some(base) = path.parent() {
            config.paths.barcodes = config.paths.barcodes.map(|p| base.join(p));
            config.paths.metadata = config.paths.metadata.map(|p| base.join(p));
        }
        Ok(config)
    }

    /// Parse settings from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Barcode table from the flag, else from the file.
    pub fn barcodes(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        flag.or_else(|| self.paths.barcodes.clone())
            .context("No barcode table given (use --barcodes or [paths].barcodes)")
    }

    /// Metadata directory from the flag, else from the file.
    pub fn metadata(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        flag.or_else(|| self.paths.metadata.clone())
            .context("No metadata directory given (use --metadata or [paths].metadata)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [paths]
            barcodes = "inputs/barcode_platemap.csv"
            metadata = "inputs/metadata"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(
            config.paths.barcodes,
            Some(PathBuf::from("inputs/barcode_platemap.csv"))
        );
        assert_eq!(config.paths.metadata, Some(PathBuf::from("inputs/metadata")));
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config::from_str("[paths]\nbarcodes = \"a.csv\"\n").unwrap();
        assert_eq!(
            config.barcodes(Some(PathBuf::from("b.csv"))).unwrap(),
            PathBuf::from("b.csv")
        );
        assert_eq!(config.barcodes(None).unwrap(), PathBuf::from("a.csv"));
        assert!(config.metadata(None).is_err());
    }

    #[test]
    fn test_relative_paths_follow_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cellprof.toml");
        std::fs::write(&path, "[paths]\nmetadata = \"metadata\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.paths.metadata, Some(dir.path().join("metadata")));
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.paths.barcodes, None);
    }
}
