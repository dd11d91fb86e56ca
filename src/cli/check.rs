use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use cellprof_pipeline::config::{
    load_section, AggregateParams, AnnotateParams, ConfigSection, FeatureSelectParams,
    NormalizeParams,
};

use super::StepArg;

/// Load one step's section and print the effective parameters as JSON
pub fn run(step: StepArg, file: PathBuf) -> Result<()> {
    match step {
        StepArg::Aggregate => show::<AggregateParams>(&file),
        StepArg::Annotate => show::<AnnotateParams>(&file),
        StepArg::Normalize => show::<NormalizeParams>(&file),
        StepArg::FeatureSelect => show::<FeatureSelectParams>(&file),
    }
}

fn show<T: ConfigSection + Serialize>(file: &Path) -> Result<()> {
    let params: T = load_section(file)
        .with_context(|| format!("Invalid {} in {}", T::KEY, file.display()))?;

    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}
