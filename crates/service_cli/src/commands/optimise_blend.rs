//! Optimise-blend command implementation
//!
//! Scans sodium fractions for the chemistry blend and reports the best one.

use std::path::Path;

use lcis_core::types::RawParameters;
use lcis_models::optimiser::{optimise_blend, BlendScanConfig};
use tracing::info;

use crate::input::{apply_assignments, load_params};
use crate::output::{blend_table, to_json, OutputFormat};
use crate::Result;

/// Build the optimise-blend output.
///
/// `li_capacity` and `na_capacity` are set by the scan; any values given
/// for them are replaced.
pub fn render(
    params_file: Option<&Path>,
    assignments: &[String],
    step: f64,
    show_curve: bool,
    format: OutputFormat,
) -> Result<String> {
    let base = match params_file {
        Some(path) => load_params(path)?,
        None => RawParameters::new(),
    };
    let base = apply_assignments(base, assignments)?;

    let optimum = optimise_blend(&base, &BlendScanConfig::with_step(step))?;
    info!(
        sodium_fraction = optimum.sodium_fraction,
        score = optimum.score,
        points = optimum.curve.len(),
        "Blend scan finished"
    );

    match format {
        OutputFormat::Json => to_json(&optimum),
        OutputFormat::Table => Ok(blend_table(&optimum, show_curve)),
    }
}

/// Run the optimise-blend command
pub fn run(
    params_file: Option<&Path>,
    assignments: &[String],
    step: f64,
    show_curve: bool,
    format: OutputFormat,
) -> Result<()> {
    print!(
        "{}",
        render(params_file, assignments, step, show_curve, format)?
    );
    Ok(())
}
