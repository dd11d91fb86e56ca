use crate::config::ConfigError;
use crate::platemap::PlatemapError;
use crate::table::TableError;

/// Error type returned by [`ProfilingBackend`](super::ProfilingBackend) implementations
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while running a pipeline step
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// I/O error preparing output locations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Platemap could not be resolved
    #[error("Platemap resolution failed: {0}")]
    PlatemapError(#[from] PlatemapError),

    /// Table could not be merged or written
    #[error("Table error: {0}")]
    TableError(#[from] TableError),

    /// Step parameters are invalid
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// The profiling library reported a failure
    #[error("Profiling backend failed during {operation}: {source}")]
    BackendError {
        /// Backend operation that failed
        operation: &'static str,
        /// Error reported by the backend
        #[source]
        source: BackendError,
    },

    /// Input and output lists of a batch step differ in length
    #[error("{inputs} input profiles but {outputs} output paths")]
    MismatchedOutputs {
        /// Number of input files
        inputs: usize,
        /// Number of output files
        outputs: usize,
    },
}

impl StepError {
    pub(crate) fn backend(operation: &'static str) -> impl FnOnce(BackendError) -> Self {
        move |source| StepError::BackendError { operation, source }
    }
}
