use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::values::{
    one_or_many, optional_float, optional_list, optional_seed, optional_string, Features,
    FieldsOfView,
};
use super::{ConfigError, ConfigSection};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn check_fraction(field: &'static str, value: f64, allow_zero: bool) -> Result<(), ConfigError> {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if lower_ok && value <= 1.0 {
        Ok(())
    } else {
        let range = if allow_zero { "[0, 1]" } else { "(0, 1]" };
        Err(ConfigError::invalid(field, format!("{value} is outside {range}")))
    }
}

fn check_features(field: &'static str, features: &Features) -> Result<(), ConfigError> {
    match features {
        Features::Columns(columns) if columns.is_empty() => {
            Err(ConfigError::invalid(field, "feature list is empty"))
        }
        _ => Ok(()),
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// How per-cell measurements are collapsed into a well profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationOperation {
    /// Per-feature median
    #[default]
    Median,
    /// Per-feature mean
    Mean,
}

/// Parameters of the single-cell aggregation step (`single_cell_config`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateParams {
    /// Columns the cells are grouped by
    pub strata: Vec<String>,
    /// Columns identifying an image
    pub image_cols: Vec<String>,
    /// Aggregation function
    pub aggregation_operation: AggregationOperation,
    /// Columns linking compartment tables to the image table
    pub merge_cols: Vec<String>,
    /// Whether image-level features are added to the profiles
    pub add_image_features: bool,
    /// Image feature categories to add
    #[serde(deserialize_with = "optional_list")]
    pub image_feature_categories: Option<Vec<String>>,
    /// Feature columns to aggregate
    pub features: Features,
    /// Whether the image table is loaded
    pub load_image_data: bool,
    /// Fraction of cells sampled per well
    pub subsample_frac: f64,
    /// Seed for subsampling
    #[serde(deserialize_with = "optional_seed")]
    pub subsampling_random_state: Option<u64>,
    /// Fields of view to include
    pub fields_of_view: FieldsOfView,
    /// Column holding the well of each field of view
    pub fields_of_view_feature: String,
    /// Column holding the per-image object number
    pub object_feature: String,
}

impl Default for AggregateParams {
    fn default() -> Self {
        Self {
            strata: strings(&["Image_Metadata_Plate", "Image_Metadata_Well"]),
            image_cols: strings(&["TableNumber", "ImageNumber"]),
            aggregation_operation: AggregationOperation::Median,
            merge_cols: strings(&["TableNumber", "ImageNumber"]),
            add_image_features: false,
            image_feature_categories: None,
            features: Features::Infer,
            load_image_data: true,
            subsample_frac: 1.0,
            subsampling_random_state: None,
            fields_of_view: FieldsOfView::All,
            fields_of_view_feature: "Image_Metadata_Well".to_string(),
            object_feature: "Metadata_ObjectNumber".to_string(),
        }
    }
}

impl ConfigSection for AggregateParams {
    const KEY: &'static str = "single_cell_config";

    fn validate(&self) -> Result<(), ConfigError> {
        if self.strata.is_empty() {
            return Err(ConfigError::invalid("strata", "at least one column is required"));
        }
        if self.image_cols.is_empty() {
            return Err(ConfigError::invalid("image_cols", "at least one column is required"));
        }
        check_fraction("subsample_frac", self.subsample_frac, false)?;
        check_features("features", &self.features)?;
        if self.add_image_features
            && self
                .image_feature_categories
                .as_ref()
                .map_or(true, |c| c.is_empty())
        {
            return Err(ConfigError::invalid(
                "image_feature_categories",
                "required when add_image_features is set",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Annotation
// ============================================================================

/// Parameters of the annotation step (`annotate_configs`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateParams {
    /// Platemap column then profile column to join on
    pub join_on: Vec<String>,
    /// Prefix platemap columns with `Metadata_`
    pub add_metadata_id_to_platemap: bool,
    /// Add Broad CMAP-style metadata columns
    pub format_broad_cmap: bool,
    /// Strip CellProfiler prefixes from metadata columns
    pub clean_cellprofiler: bool,
    /// Extra metadata file joined after the platemap
    #[serde(deserialize_with = "optional_string")]
    pub external_metadata: Option<String>,
    /// Profile-side key(s) for the external metadata join
    #[serde(deserialize_with = "optional_list")]
    pub external_join_left: Option<Vec<String>>,
    /// External-side key(s) for the external metadata join
    #[serde(deserialize_with = "optional_list")]
    pub external_join_right: Option<Vec<String>>,
    /// Output compression, e.g. `gzip`
    #[serde(deserialize_with = "optional_string")]
    pub compression_options: Option<String>,
    /// printf-style float format for the output
    #[serde(deserialize_with = "optional_string")]
    pub float_format: Option<String>,
    /// Extra arguments for CMAP formatting
    pub cmap_args: serde_json::Map<String, serde_json::Value>,
}

impl Default for AnnotateParams {
    fn default() -> Self {
        Self {
            join_on: strings(&["Metadata_well_position", "Metadata_Well"]),
            add_metadata_id_to_platemap: true,
            format_broad_cmap: false,
            clean_cellprofiler: true,
            external_metadata: None,
            external_join_left: None,
            external_join_right: None,
            compression_options: None,
            float_format: None,
            cmap_args: serde_json::Map::new(),
        }
    }
}

impl AnnotateParams {
    /// Platemap column of the join; `join_on` must have passed [`ConfigSection::validate`]
    pub fn platemap_key(&self) -> &str {
        &self.join_on[0]
    }

    /// Profile column of the join; `join_on` must have passed [`ConfigSection::validate`]
    pub fn profile_key(&self) -> &str {
        &self.join_on[1]
    }
}

impl ConfigSection for AnnotateParams {
    const KEY: &'static str = "annotate_configs";

    fn validate(&self) -> Result<(), ConfigError> {
        if self.join_on.len() != 2 || self.join_on.iter().any(|c| c.is_empty()) {
            return Err(ConfigError::invalid(
                "join_on",
                format!(
                    "expected [platemap column, profile column], got {:?}",
                    self.join_on
                ),
            ));
        }
        if self.external_metadata.is_some()
            && (self.external_join_left.is_none() || self.external_join_right.is_none())
        {
            return Err(ConfigError::invalid(
                "external_metadata",
                "external_join_left and external_join_right are required",
            ));
        }
        if let (Some(left), Some(right)) = (&self.external_join_left, &self.external_join_right) {
            if left.len() != right.len() {
                return Err(ConfigError::invalid(
                    "external_join_right",
                    format!("{} keys on the left, {} on the right", left.len(), right.len()),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalization applied to annotated profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum NormalizeMethod {
    /// Z-score against the sample mean and standard deviation
    #[default]
    Standardize,
    /// Center on the median, scale by the interquartile range
    Robustize,
    /// Center on the median, scale by the median absolute deviation
    MadRobustize,
    /// Whitening transform
    Spherize,
}

impl NormalizeMethod {
    /// Every supported method, as written in configs
    pub const ALL: [NormalizeMethod; 4] = [
        NormalizeMethod::Standardize,
        NormalizeMethod::Robustize,
        NormalizeMethod::MadRobustize,
        NormalizeMethod::Spherize,
    ];

    /// Config spelling of the method
    pub fn as_str(self) -> &'static str {
        match self {
            NormalizeMethod::Standardize => "standardize",
            NormalizeMethod::Robustize => "robustize",
            NormalizeMethod::MadRobustize => "mad_robustize",
            NormalizeMethod::Spherize => "spherize",
        }
    }
}

impl fmt::Display for NormalizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalizeMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NormalizeMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConfigError::UnsupportedMethod {
                method: s.to_string(),
                supported: NormalizeMethod::ALL.iter().map(|m| m.as_str()).collect(),
            })
    }
}

impl TryFrom<String> for NormalizeMethod {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Metadata columns excluded from normalization unless a config says otherwise
pub const DEFAULT_META_FEATURES: [&str; 4] = [
    "Metadata_Plate",
    "Metadata_Well",
    "Metadata_Plate_Map_Name",
    "Metadata_Object_Count",
];

/// Parameters of the normalization step (`normalize_configs`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeParams {
    /// Normalization method
    pub method: NormalizeMethod,
    /// Feature columns to normalize
    pub features: Features,
    /// Metadata columns carried through untouched
    pub meta_features: Vec<String>,
    /// Rows the normalization statistics are computed from
    pub samples: String,
    /// Output compression
    #[serde(deserialize_with = "optional_string")]
    pub compression_options: Option<String>,
    /// printf-style float format for the output
    #[serde(deserialize_with = "optional_string")]
    pub float_format: Option<String>,
    /// Whitening variant used by `spherize`
    pub spherize_method: String,
    /// Regularization added during whitening
    pub spherize_epsilon: f64,
    /// Floor for the MAD in `mad_robustize`
    pub mad_robustize_epsilon: f64,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            method: NormalizeMethod::Standardize,
            features: Features::Infer,
            meta_features: strings(&DEFAULT_META_FEATURES),
            samples: "all".to_string(),
            compression_options: Some("gzip".to_string()),
            float_format: None,
            spherize_method: "ZCA-cor".to_string(),
            spherize_epsilon: 1e-6,
            mad_robustize_epsilon: 1e-18,
        }
    }
}

impl NormalizeParams {
    /// Parameters for `method` with every other value at its default
    pub fn with_method(method: NormalizeMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    /// Metadata columns with repeats removed, first occurrence kept
    pub fn unique_meta_features(&self) -> Vec<&str> {
        let mut unique: Vec<&str> = Vec::with_capacity(self.meta_features.len());
        for feature in &self.meta_features {
            if !unique.contains(&feature.as_str()) {
                unique.push(feature);
            }
        }
        unique
    }
}

impl ConfigSection for NormalizeParams {
    const KEY: &'static str = "normalize_configs";

    fn validate(&self) -> Result<(), ConfigError> {
        check_features("features", &self.features)?;
        if self.samples.trim().is_empty() {
            return Err(ConfigError::invalid("samples", "must not be empty"));
        }
        if self.spherize_epsilon <= 0.0 {
            return Err(ConfigError::invalid("spherize_epsilon", "must be positive"));
        }
        if self.mad_robustize_epsilon < 0.0 {
            return Err(ConfigError::invalid(
                "mad_robustize_epsilon",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Feature selection
// ============================================================================

/// A feature-selection operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSelectOperation {
    /// Drop near-constant features
    VarianceThreshold,
    /// Drop features highly correlated with another
    CorrelationThreshold,
    /// Drop features with too many missing values
    DropNaColumns,
    /// Drop features named in a blocklist
    Blocklist,
    /// Drop features with extreme values
    DropOutliers,
    /// Drop features that vary too much within perturbation groups
    NoiseRemoval,
}

/// Correlation coefficient used by `correlation_threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Pearson product-moment correlation
    #[default]
    Pearson,
    /// Spearman rank correlation
    Spearman,
    /// Kendall rank correlation
    Kendall,
}

/// Parameters of the feature-selection step (`feature_select_configs`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSelectParams {
    /// Feature columns to consider
    pub features: Features,
    /// Whether image-level features are considered
    pub image_features: bool,
    /// Rows the selection statistics are computed from
    pub samples: String,
    /// Operations, applied in order
    #[serde(deserialize_with = "one_or_many")]
    pub operation: Vec<FeatureSelectOperation>,
    /// Largest tolerated fraction of missing values
    pub na_cutoff: f64,
    /// Correlation above which one of a pair is dropped
    pub corr_threshold: f64,
    /// Correlation coefficient
    pub corr_method: CorrelationMethod,
    /// Ratio of second most to most common value below which a feature is near-constant
    pub freq_cut: f64,
    /// Ratio of distinct values to samples below which a feature is near-constant
    pub unique_cut: f64,
    /// Output compression
    #[serde(deserialize_with = "optional_string")]
    pub compression_options: Option<String>,
    /// printf-style float format for the output
    #[serde(deserialize_with = "optional_string")]
    pub float_format: Option<String>,
    /// Blocklist file; the library's bundled list when absent
    #[serde(deserialize_with = "optional_string")]
    pub blocklist_file: Option<String>,
    /// Absolute value above which a feature counts as an outlier
    pub outlier_cutoff: f64,
    /// Column defining perturbation groups for noise removal
    #[serde(deserialize_with = "optional_string")]
    pub noise_removal_perturb_groups: Option<String>,
    /// Within-group standard deviation above which a feature is dropped
    #[serde(deserialize_with = "optional_float")]
    pub noise_removal_stdev_cutoff: Option<f64>,
}

impl Default for FeatureSelectParams {
    fn default() -> Self {
        Self {
            features: Features::Infer,
            image_features: false,
            samples: "all".to_string(),
            operation: vec![FeatureSelectOperation::VarianceThreshold],
            na_cutoff: 0.05,
            corr_threshold: 0.9,
            corr_method: CorrelationMethod::Pearson,
            freq_cut: 0.05,
            unique_cut: 0.01,
            compression_options: None,
            float_format: None,
            blocklist_file: None,
            outlier_cutoff: 500.0,
            noise_removal_perturb_groups: None,
            noise_removal_stdev_cutoff: None,
        }
    }
}

impl ConfigSection for FeatureSelectParams {
    const KEY: &'static str = "feature_select_configs";

    fn validate(&self) -> Result<(), ConfigError> {
        check_features("features", &self.features)?;
        if self.operation.is_empty() {
            return Err(ConfigError::invalid("operation", "at least one operation is required"));
        }
        check_fraction("na_cutoff", self.na_cutoff, true)?;
        check_fraction("corr_threshold", self.corr_threshold, true)?;
        check_fraction("freq_cut", self.freq_cut, true)?;
        check_fraction("unique_cut", self.unique_cut, true)?;
        if self.outlier_cutoff <= 0.0 {
            return Err(ConfigError::invalid("outlier_cutoff", "must be positive"));
        }
        if self.operation.contains(&FeatureSelectOperation::NoiseRemoval) {
            if self.noise_removal_perturb_groups.is_none() {
                return Err(ConfigError::invalid(
                    "noise_removal_perturb_groups",
                    "required by the noise_removal operation",
                ));
            }
            if self.noise_removal_stdev_cutoff.is_none() {
                return Err(ConfigError::invalid(
                    "noise_removal_stdev_cutoff",
                    "required by the noise_removal operation",
                ));
            }
        }
        Ok(())
    }
}
