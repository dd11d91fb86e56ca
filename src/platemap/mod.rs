//! # Platemap Resolution
//!
//! Every plate imaged in a run is identified by an assay plate barcode. The barcode
//! table maps each barcode to the name of a platemap (the per-well treatment layout
//! shared by all plates printed from it), and platemaps live on disk by convention:
//!
//! ```text
//! <metadata_dir>/
//! └── platemap/
//!     ├── Plate1.csv
//!     └── Plate2.csv
//! ```
//!
//! Resolution loads the barcode table, requires exactly one row for the plate, and
//! loads `<metadata_dir>/platemap/<Plate_Map_Name>.csv` with its native headers.
//! Nothing is cached; every call reads both files again.
//!
//! ```rust,no_run
//! use cellprof_pipeline::platemap::{PlateIdentifier, PlatemapResolver};
//!
//! let resolver = PlatemapResolver::new("inputs/barcode_platemap.csv", "inputs/metadata");
//! let plate = PlateIdentifier::from_data_file("inputs/SQ00014613.sqlite")?;
//! let platemap = resolver.resolve(&plate)?;
//! println!("{} wells", platemap.table.row_count());
//! # Ok::<(), cellprof_pipeline::platemap::PlatemapError>(())
//! ```

mod barcode;
mod error;
mod identifier;


pub use barcode::{BarcodeEntry, BarcodeTable, BARCODE_COLUMN, PLATEMAP_NAME_COLUMN};
pub use error::PlatemapError;
pub use identifier::PlateIdentifier;

use std::path::{Path, PathBuf};

use log::debug;

use crate::table::{Delimiter, Table};

/// Subdirectory of the metadata directory holding platemap files
pub const PLATEMAP_SUBDIR: &str = "platemap";

/// Extension of platemap files
pub const PLATEMAP_EXTENSION: &str = "csv";

/// A loaded platemap together with where it came from
#[derive(Debug, Clone)]
pub struct PlateMap {
    /// Platemap name from the barcode table
    pub name: String,
    /// File the platemap was loaded from
    pub path: PathBuf,
    /// Per-well metadata, exactly as stored in the file
    pub table: Table,
}

/// Location of the platemap file called `name` under `metadata_dir`
pub fn platemap_path<P: AsRef<Path>>(metadata_dir: P, name: &str) -> PathBuf {
    metadata_dir
        .as_ref()
        .join(PLATEMAP_SUBDIR)
        .join(format!("{name}.{PLATEMAP_EXTENSION}"))
}

/// Load a platemap file as a comma-separated table
pub fn load_platemap<P: AsRef<Path>>(path: P) -> Result<Table, PlatemapError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PlatemapError::PlatemapFileNotFound(path.to_path_buf()));
    }
    Table::from_path(path, Delimiter::Comma).map_err(|source| PlatemapError::InvalidPlatemap {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve `plate_identifier` to its loaded platemap.
///
/// Fails with [`PlatemapError::PlateNotFound`] or [`PlatemapError::AmbiguousPlate`]
/// before any platemap file is touched when the barcode table does not hold exactly
/// one row for the plate.
pub fn resolve<P, Q>(
    plate_identifier: &str,
    barcode_table_path: P,
    metadata_dir: Q,
) -> Result<Table, PlatemapError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let plate = PlateIdentifier::new(plate_identifier)?;
    PlatemapResolver::new(barcode_table_path.as_ref(), metadata_dir.as_ref())
        .resolve(&plate)
        .map(|platemap| platemap.table)
}

/// Barcode table and metadata directory used to resolve plates
#[derive(Debug, Clone)]
pub struct PlatemapResolver {
    barcode_table_path: PathBuf,
    metadata_dir: PathBuf,
}

impl PlatemapResolver {
    /// Create a resolver over a barcode table file and a metadata directory
    pub fn new(barcode_table_path: impl Into<PathBuf>, metadata_dir: impl Into<PathBuf>) -> Self {
        Self {
            barcode_table_path: barcode_table_path.into(),
            metadata_dir: metadata_dir.into(),
        }
    }

    /// Barcode table this resolver reads
    pub fn barcode_table_path(&self) -> &Path {
        &self.barcode_table_path
    }

    /// Metadata directory this resolver reads platemaps from
    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    /// Platemap name for a plate, without loading the platemap itself
    pub fn platemap_name(&self, plate: &PlateIdentifier) -> Result<String, PlatemapError> {
        let barcodes = BarcodeTable::from_path(&self.barcode_table_path)?;
        let name = barcodes.lookup(plate)?;
        debug!("Plate {} uses platemap {}", plate, name);
        Ok(name.to_string())
    }

    /// Resolve a plate to its platemap
    pub fn resolve(&self, plate: &PlateIdentifier) -> Result<PlateMap, PlatemapError> {
        let name = self.platemap_name(plate)?;
        let path = platemap_path(&self.metadata_dir, &name);
        debug!("Loading platemap {}", path.display());

        let table = load_platemap(&path)?;
        Ok(PlateMap { name, path, table })
    }

    /// Resolve the plate a data file belongs to
    pub fn resolve_for_file<P: AsRef<Path>>(
        &self,
        data_file: P,
    ) -> Result<(PlateIdentifier, PlateMap), PlatemapError> {
        let plate = PlateIdentifier::from_data_file(data_file)?;
        let platemap = self.resolve(&plate)?;
        Ok((plate, platemap))
    }
}
