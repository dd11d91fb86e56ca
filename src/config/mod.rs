//! # Step Configuration
//!
//! Each pipeline step reads its parameters from one section of a config document.
//! Config files are YAML unless their extension is `.toml`:
//!
//! ```yaml
//! # aggregate_configs.yaml
//! single_cell_config:
//!   name: single_cell
//!   params:
//!     strata: ["Image_Metadata_Plate", "Image_Metadata_Well"]
//!     aggregation_operation: median
//!     subsample_frac: 1
//!     subsampling_random_state: None
//!     fields_of_view: all
//! ```
//!
//! Only `<section>.params` is read; sibling keys such as `name` are ignored. Missing
//! parameters take the defaults of the profiling library, and every section is
//! validated after parsing.

mod error;
mod params;
mod values;


pub use error::ConfigError;
pub use params::{
    AggregateParams, AggregationOperation, AnnotateParams, CorrelationMethod,
    FeatureSelectOperation, FeatureSelectParams, NormalizeMethod, NormalizeParams,
    DEFAULT_META_FEATURES,
};
pub use values::{Features, FieldsOfView};

use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Key under a section holding the parameters
pub const PARAMS_KEY: &str = "params";

/// A typed parameter set stored under `<KEY>.params` in a config document
pub trait ConfigSection: DeserializeOwned {
    /// Top-level key of the section
    const KEY: &'static str;

    /// Reject values that parse but cannot be used
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Syntax of a config document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// YAML
    #[default]
    Yaml,
    /// TOML
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else is read as YAML
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Load and validate the `T` section of a config file
pub fn load_section<T: ConfigSection, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let path = path.as_ref();
    debug!("Loading {} from {}", T::KEY, path.display());
    let content = std::fs::read_to_string(path)?;
    section_from_str(&content, ConfigFormat::from_path(path))
}

/// Parse and validate the `T` section of a config document
pub fn section_from_str<T: ConfigSection>(
    content: &str,
    format: ConfigFormat,
) -> Result<T, ConfigError> {
    let section: T = match format {
        ConfigFormat::Yaml => {
            let document: serde_yaml::Value = serde_yaml::from_str(content)?;
            let params = document
                .get(T::KEY)
                .and_then(|section| section.get(PARAMS_KEY))
                .ok_or(ConfigError::MissingSection(T::KEY))?;
            // An empty `params:` means "all defaults"
            if params.is_null() {
                T::deserialize(serde_yaml::Value::Mapping(Default::default()))?
            } else {
                T::deserialize(params.clone())?
            }
        }
        ConfigFormat::Toml => {
            let document: toml::Table = toml::from_str(content)?;
            let params = document
                .get(T::KEY)
                .and_then(|section| section.get(PARAMS_KEY))
                .ok_or(ConfigError::MissingSection(T::KEY))?;
            T::deserialize(params.clone())?
        }
    };

    section.validate()?;
    Ok(section)
}
