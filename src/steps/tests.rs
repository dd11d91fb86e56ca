use super::*;
use crate::config::{NormalizeMethod, NormalizeParams};
use crate::platemap::{PlatemapError, PLATEMAP_SUBDIR};
use std::fs;
use std::io::Cursor;

/// Backend that records calls and serves canned cell counts
#[derive(Default)]
struct RecordingBackend {
    calls: Vec<String>,
    counts: Option<Table>,
    annotated_platemap: Option<Table>,
    fail_on: Option<&'static str>,
}

impl RecordingBackend {
    fn with_counts(csv: &str) -> Self {
        Self {
            counts: Some(Table::from_reader(Cursor::new(csv), crate::table::Delimiter::Comma).unwrap()),
            ..Default::default()
        }
    }

    fn record(&mut self, op: &'static str, path: &Path) -> Result<(), BackendError> {
        self.calls.push(format!("{op}:{}", path.file_name().unwrap().to_string_lossy()));
        if self.fail_on == Some(op) {
            return Err(format!("{op} exploded").into());
        }
        Ok(())
    }
}

impl ProfilingBackend for RecordingBackend {
    fn count_cells(
        &mut self,
        sql_file: &Path,
        _params: &AggregateParams,
    ) -> Result<Table, BackendError> {
        self.record("count_cells", sql_file)?;
        self.counts.clone().ok_or_else(|| "no counts configured".into())
    }

    fn aggregate_profiles(
        &mut self,
        sql_file: &Path,
        _params: &AggregateParams,
        _output: &Path,
    ) -> Result<(), BackendError> {
        self.record("aggregate_profiles", sql_file)
    }

    fn annotate(
        &mut self,
        profiles: &Path,
        platemap: &Table,
        _params: &AnnotateParams,
        _output: &Path,
    ) -> Result<(), BackendError> {
        self.annotated_platemap = Some(platemap.clone());
        self.record("annotate", profiles)
    }

    fn normalize(
        &mut self,
        profiles: &Path,
        _params: &NormalizeParams,
        _output: &Path,
    ) -> Result<(), BackendError> {
        self.record("normalize", profiles)
    }

    fn feature_select(
        &mut self,
        profiles: &Path,
        _params: &FeatureSelectParams,
        _output: &Path,
    ) -> Result<(), BackendError> {
        self.record("feature_select", profiles)
    }
}

const BARCODES: &str = "Assay_Plate_Barcode,Plate_Map_Name
SQ00014613,Plate1
SQ00014614,Plate1";

const PLATEMAP: &str = "WellRow,WellCol,well_position,Metadata_Treatment
A,1,A01,DMSO
A,2,A02,Staurosporine";

const COUNTS: &str = "Image_Metadata_Plate,Image_Metadata_Well,Metadata_Object_Count
SQ00014613,A01,120
SQ00014613,A02,98";

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("barcodes.csv"), BARCODES).unwrap();
        let platemaps = dir.path().join("metadata").join(PLATEMAP_SUBDIR);
        fs::create_dir_all(&platemaps).unwrap();
        fs::write(platemaps.join("Plate1.csv"), PLATEMAP).unwrap();
        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn aggregate_files(&self, sql: &str) -> AggregateFiles {
        AggregateFiles {
            sql_file: self.path(sql),
            barcodes: self.path("barcodes.csv"),
            metadata_dir: self.path("metadata"),
            cell_counts_out: self.path("results/counts/SQ00014613_cell_counts.tsv"),
            aggregate_out: self.path("results/SQ00014613_aggregate.csv.gz"),
        }
    }
}

#[test]
fn test_merge_cell_counts_drops_layout_columns() {
    let counts = Table::from_reader(Cursor::new(COUNTS), crate::table::Delimiter::Comma).unwrap();
    let platemap =
        Table::from_reader(Cursor::new(PLATEMAP), crate::table::Delimiter::Comma).unwrap();

    let merged = merge_cell_counts(&counts, &platemap).unwrap();
    assert_eq!(
        merged.headers(),
        [
            "Image_Metadata_Plate",
            "Image_Metadata_Well",
            "Metadata_Object_Count",
            "Metadata_Treatment"
        ]
    );
    assert_eq!(merged.row_count(), 2);
}

#[test]
fn test_merge_cell_counts_without_row_col() {
    let counts = Table::from_reader(Cursor::new(COUNTS), crate::table::Delimiter::Comma).unwrap();
    let platemap = Table::from_reader(
        Cursor::new("well_position,Metadata_Treatment\nA01,DMSO\n"),
        crate::table::Delimiter::Comma,
    )
    .unwrap();

    let merged = merge_cell_counts(&counts, &platemap).unwrap();
    assert!(!merged.has_column(PLATEMAP_WELL_COLUMN));
    assert_eq!(merged.row_count(), 1);
}

#[test]
fn test_aggregate_writes_cell_counts() {
    let ws = Workspace::new();
    let files = ws.aggregate_files("SQ00014613.sqlite");
    let mut backend = RecordingBackend::with_counts(COUNTS);

    let report = aggregate(&files, &AggregateParams::default(), &mut backend).unwrap();
    assert_eq!(report.plate.as_str(), "SQ00014613");
    assert_eq!(report.platemap, "Plate1");
    assert_eq!(report.cell_count_rows, 2);
    assert_eq!(
        backend.calls,
        vec![
            "count_cells:SQ00014613.sqlite",
            "aggregate_profiles:SQ00014613.sqlite"
        ]
    );

    let written = fs::read_to_string(&files.cell_counts_out).unwrap();
    assert_eq!(
        written,
        "Image_Metadata_Plate\tImage_Metadata_Well\tMetadata_Object_Count\tMetadata_Treatment\n\
         SQ00014613\tA01\t120\tDMSO\n\
         SQ00014613\tA02\t98\tStaurosporine\n"
    );
}

#[test]
fn test_aggregate_unknown_plate_never_calls_backend() {
    let ws = Workspace::new();
    let files = ws.aggregate_files("SQ99999999.sqlite");
    let mut backend = RecordingBackend::with_counts(COUNTS);

    let err = aggregate(&files, &AggregateParams::default(), &mut backend).unwrap_err();
    assert!(matches!(
        err,
        StepError::PlatemapError(PlatemapError::PlateNotFound(_))
    ));
    assert!(backend.calls.is_empty());
    assert!(!files.cell_counts_out.exists());
}

#[test]
fn test_aggregate_backend_failure_is_reported() {
    let ws = Workspace::new();
    let files = ws.aggregate_files("SQ00014613.sqlite");
    let mut backend = RecordingBackend {
        fail_on: Some("aggregate_profiles"),
        ..RecordingBackend::with_counts(COUNTS)
    };

    let err = aggregate(&files, &AggregateParams::default(), &mut backend).unwrap_err();
    assert!(matches!(
        err,
        StepError::BackendError { operation: "aggregate_profiles", .. }
    ));
    assert!(err.to_string().contains("aggregate_profiles exploded"));
    // Counts are written before aggregation starts
    assert!(files.cell_counts_out.exists());
}

#[test]
fn test_aggregate_rejects_invalid_params() {
    let ws = Workspace::new();
    let files = ws.aggregate_files("SQ00014613.sqlite");
    let mut backend = RecordingBackend::with_counts(COUNTS);
    let params = AggregateParams {
        subsample_frac: 2.0,
        ..Default::default()
    };

    let err = aggregate(&files, &params, &mut backend).unwrap_err();
    assert!(matches!(err, StepError::ConfigError(_)));
    assert!(backend.calls.is_empty());
}

#[test]
fn test_annotate_passes_platemap() {
    let ws = Workspace::new();
    let files = AnnotateFiles {
        profiles: ws.path("results/SQ00014614_aggregate.csv.gz"),
        barcodes: ws.path("barcodes.csv"),
        metadata_dir: ws.path("metadata"),
        output: ws.path("results/SQ00014614_annotated.csv.gz"),
    };
    let mut backend = RecordingBackend::default();

    let report = annotate(&files, &AnnotateParams::default(), &mut backend).unwrap();
    assert_eq!(report.plate.as_str(), "SQ00014614");
    assert_eq!(report.platemap, "Plate1");
    assert_eq!(report.platemap_rows, 2);
    assert_eq!(backend.calls, vec!["annotate:SQ00014614_aggregate.csv.gz"]);

    let passed = backend.annotated_platemap.unwrap();
    assert_eq!(passed.headers()[2], "well_position");
    assert_eq!(passed.get(1, "Metadata_Treatment"), Some("Staurosporine"));
}

#[test]
fn test_normalize_pairs_in_order() {
    let inputs = vec![PathBuf::from("a_annotated.csv.gz"), PathBuf::from("b_annotated.csv.gz")];
    let outputs = vec![PathBuf::from("a_norm.csv.gz"), PathBuf::from("b_norm.csv.gz")];
    let mut backend = RecordingBackend::default();

    let params = NormalizeParams::with_method(NormalizeMethod::MadRobustize);
    let report = normalize(&inputs, &outputs, &params, &mut backend).unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.processed[1], (inputs[1].clone(), outputs[1].clone()));
    assert_eq!(
        backend.calls,
        vec!["normalize:a_annotated.csv.gz", "normalize:b_annotated.csv.gz"]
    );
}

#[test]
fn test_batch_length_mismatch() {
    let inputs = vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")];
    let outputs = vec![PathBuf::from("a_out.csv")];
    let mut backend = RecordingBackend::default();

    let err = feature_select(&inputs, &outputs, &FeatureSelectParams::default(), &mut backend)
        .unwrap_err();
    assert!(matches!(
        err,
        StepError::MismatchedOutputs { inputs: 2, outputs: 1 }
    ));
    assert!(backend.calls.is_empty());
}

#[test]
fn test_feature_select_stops_at_first_failure() {
    let inputs = vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")];
    let outputs = vec![PathBuf::from("a_out.csv"), PathBuf::from("b_out.csv")];
    let mut backend = RecordingBackend {
        fail_on: Some("feature_select"),
        ..Default::default()
    };

    let err = feature_select(&inputs, &outputs, &FeatureSelectParams::default(), &mut backend)
        .unwrap_err();
    assert!(matches!(err, StepError::BackendError { .. }));
    assert_eq!(backend.calls, vec!["feature_select:a.csv"]);
}
