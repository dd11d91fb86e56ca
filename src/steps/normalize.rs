use std::path::PathBuf;

use log::info;

use super::{ensure_parent, pair_files, BatchReport, ProfilingBackend, StepError};
use crate::config::{ConfigSection, NormalizeParams};

/// Normalize each annotated profile into the output at the same position
pub fn normalize<B: ProfilingBackend + ?Sized>(
    inputs: &[PathBuf],
    outputs: &[PathBuf],
    params: &NormalizeParams,
    backend: &mut B,
) -> Result<BatchReport, StepError> {
    params.validate()?;

    let mut report = BatchReport::default();
    for (input, output) in pair_files(inputs, outputs)? {
        info!(
            "Normalizing {} ({}) -> {}",
            input.display(),
            params.method,
            output.display()
        );
        ensure_parent(output)?;
        backend
            .normalize(input, params, output)
            .map_err(StepError::backend("normalize"))?;
        report.processed.push((input.clone(), output.clone()));
    }
    Ok(report)
}
