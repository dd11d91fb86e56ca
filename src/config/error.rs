/// Errors that can occur while loading step configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML syntax or type error
    #[error("YAML configuration error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML syntax or type error
    #[error("TOML configuration error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The document has no `<section>.params` mapping
    #[error("Missing configuration section: {0}.params")]
    MissingSection(&'static str),

    /// Normalization method outside the supported set
    #[error("Unsupported normalization method {method:?}. Supported methods: {}", .supported.join(", "))]
    UnsupportedMethod {
        /// Method name as written in the config
        method: String,
        /// Every method the pipeline accepts
        supported: Vec<&'static str>,
    },

    /// A parameter parsed but holds an unusable value
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Parameter name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
