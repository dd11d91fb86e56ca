//! Integration tests for platemap resolution
//!
//! These tests build a metadata directory on disk the way a pipeline run lays it out
//! and resolve plates through the public API.

use cellprof_pipeline::platemap::{resolve, PlateIdentifier, PlatemapError, PlatemapResolver};
use cellprof_pipeline::table::{Delimiter, Table};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Barcode table at `<root>/barcodes.csv`, platemaps under `<root>/metadata/platemap/`
fn metadata_layout(barcodes: &str, platemaps: &[(&str, &str)]) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().unwrap();
    let barcode_path = dir.path().join("barcodes.csv");
    fs::write(&barcode_path, barcodes).unwrap();

    let metadata_dir = dir.path().join("metadata");
    fs::create_dir_all(metadata_dir.join("platemap")).unwrap();
    for (name, contents) in platemaps {
        fs::write(metadata_dir.join("platemap").join(format!("{name}.csv")), contents).unwrap();
    }
    (dir, barcode_path, metadata_dir)
}

fn read_file_table(path: &Path) -> Table {
    Table::from_path(path, Delimiter::Comma).unwrap()
}

/// Single matching row: the platemap comes back exactly as stored
#[test]
fn test_single_row_scenario() {
    let (_dir, barcodes, metadata) = metadata_layout(
        "Assay_Plate_Barcode,Plate_Map_Name\nSQ00014613,Plate1\n",
        &[("Plate1", "well_position,Metadata_Treatment\nA01,DMSO\n")],
    );

    let table = resolve("SQ00014613", &barcodes, &metadata).unwrap();
    assert_eq!(table.headers(), ["well_position", "Metadata_Treatment"]);
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.rows()[0], vec!["A01", "DMSO"]);
}

/// Shared platemaps resolve to the same file for every plate using them
#[test]
fn test_many_plates_one_platemap() {
    let platemap = "WellRow,WellCol,well_position,Metadata_pert_name,Metadata_dose\n\
                    A,1,A01,DMSO,0\n\
                    A,2,A02,bortezomib,0.1\n\
                    B,1,B01,bortezomib,1.0\n";
    let (_dir, barcodes, metadata) = metadata_layout(
        "Assay_Plate_Barcode,Plate_Map_Name\n\
         SQ00014613,C-7161-01-LM6-001\n\
         SQ00014614,C-7161-01-LM6-001\n\
         SQ00014615,C-7161-01-LM6-002\n",
        &[
            ("C-7161-01-LM6-001", platemap),
            ("C-7161-01-LM6-002", "well_position\nA01\n"),
        ],
    );

    let on_disk = read_file_table(&metadata.join("platemap/C-7161-01-LM6-001.csv"));
    let resolver = PlatemapResolver::new(&barcodes, &metadata);
    for plate in ["SQ00014613", "SQ00014614"] {
        let resolved = resolver.resolve(&PlateIdentifier::new(plate).unwrap()).unwrap();
        assert_eq!(resolved.name, "C-7161-01-LM6-001");
        assert_eq!(resolved.table, on_disk);
    }

    let other = resolver.resolve(&PlateIdentifier::new("SQ00014615").unwrap()).unwrap();
    assert_eq!(other.name, "C-7161-01-LM6-002");
    assert_eq!(other.table.row_count(), 1);
}

/// Unknown plate: lookup error, and no platemap is opened
#[test]
fn test_unknown_plate_scenario() {
    let (_dir, barcodes, metadata) = metadata_layout(
        "Assay_Plate_Barcode,Plate_Map_Name\nSQ00014613,Plate1\n",
        &[("Plate1", "well_position\nA01\n")],
    );
    // Even a broken metadata directory is never reached
    fs::remove_dir_all(&metadata).unwrap();

    let err = resolve("SQ99999999", &barcodes, &metadata).unwrap_err();
    assert!(matches!(err, PlatemapError::PlateNotFound(ref p) if p == "SQ99999999"));
    assert!(err.to_string().contains("SQ99999999"));
}

/// Duplicate barcode rows are an error naming both platemaps
#[test]
fn test_duplicate_barcode_scenario() {
    let (_dir, barcodes, metadata) = metadata_layout(
        "Assay_Plate_Barcode,Plate_Map_Name\nSQ00014613,Plate1\nSQ00014613,Plate2\n",
        &[("Plate1", "well_position\nA01\n"), ("Plate2", "well_position\nB01\n")],
    );

    let err = resolve("SQ00014613", &barcodes, &metadata).unwrap_err();
    match err {
        PlatemapError::AmbiguousPlate { barcode, platemaps } => {
            assert_eq!(barcode, "SQ00014613");
            assert_eq!(platemaps, vec!["Plate1", "Plate2"]);
        }
        other => panic!("expected ambiguity, got {other}"),
    }
}

/// A platemap survives load then write unchanged
#[test]
fn test_platemap_load_write_roundtrip() {
    let contents = "well_position,Metadata_Treatment,Metadata_Note\n\
                    A01,DMSO,\"control, vehicle\"\n\
                    A02,Taxol,\n";
    let (dir, barcodes, metadata) = metadata_layout(
        "Assay_Plate_Barcode,Plate_Map_Name\nSQ1,Plate1\n",
        &[("Plate1", contents)],
    );

    let table = resolve("SQ1", &barcodes, &metadata).unwrap();
    let copy = dir.path().join("copy.csv");
    table.to_path(&copy, Delimiter::Comma).unwrap();

    assert_eq!(fs::read_to_string(&copy).unwrap(), contents);
    assert_eq!(read_file_table(&copy), table);
}

/// Missing platemap file is reported with its path
#[test]
fn test_missing_platemap_file() {
    let (_dir, barcodes, metadata) = metadata_layout(
        "Assay_Plate_Barcode,Plate_Map_Name\nSQ1,Plate7\n",
        &[],
    );

    let err = resolve("SQ1", &barcodes, &metadata).unwrap_err();
    assert!(matches!(err, PlatemapError::PlatemapFileNotFound(ref p) if p.ends_with("platemap/Plate7.csv")));
}

/// Malformed platemap files surface as invalid platemaps
#[test]
fn test_malformed_platemap_file() {
    let (_dir, barcodes, metadata) = metadata_layout(
        "Assay_Plate_Barcode,Plate_Map_Name\nSQ1,Plate1\n",
        &[("Plate1", "well_position,well_position\nA01,A01\n")],
    );

    let err = resolve("SQ1", &barcodes, &metadata).unwrap_err();
    assert!(matches!(err, PlatemapError::InvalidPlatemap { .. }));
}

/// Identifiers derived from pipeline file names resolve
#[test]
fn test_resolve_from_pipeline_file_names() {
    let (_dir, barcodes, metadata) = metadata_layout(
        "Assay_Plate_Barcode,Plate_Map_Name\nSQ00014613,Plate1\n",
        &[("Plate1", "well_position\nA01\n")],
    );
    let resolver = PlatemapResolver::new(barcodes, metadata);

    for file in [
        "data/SQ00014613.sqlite",
        "results/aggregated/SQ00014613_aggregate.csv.gz",
        "results/annotated/SQ00014613_annotated.csv.gz",
    ] {
        let (plate, platemap) = resolver.resolve_for_file(file).unwrap();
        assert_eq!(plate.as_str(), "SQ00014613");
        assert_eq!(platemap.name, "Plate1");
    }
}
