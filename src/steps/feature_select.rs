use std::path::PathBuf;

use log::info;

use super::{ensure_parent, pair_files, BatchReport, ProfilingBackend, StepError};
use crate::config::{ConfigSection, FeatureSelectParams};

/// Run feature selection on each normalized profile
pub fn feature_select<B: ProfilingBackend + ?Sized>(
    inputs: &[PathBuf],
    outputs: &[PathBuf],
    params: &FeatureSelectParams,
    backend: &mut B,
) -> Result<BatchReport, StepError> {
    params.validate()?;

    let mut report = BatchReport::default();
    for (input, output) in pair_files(inputs, outputs)? {
        info!(
            "Selecting features from {} ({:?}) -> {}",
            input.display(),
            params.operation,
            output.display()
        );
        ensure_parent(output)?;
        backend
            .feature_select(input, params, output)
            .map_err(StepError::backend("feature_select"))?;
        report.processed.push((input.clone(), output.clone()));
    }
    Ok(report)
}
