//! Evaluate command implementation
//!
//! Evaluates one calculator over a parameter file and `--set` overrides.

use std::path::Path;

use lcis_core::traits::Calculator;
use lcis_core::types::{RawParameters, ResultRecord};
use lcis_models::calculators::CalculatorKind;
use tracing::info;

use crate::input::{apply_assignments, load_params};
use crate::output::{record_table, to_json, OutputFormat};
use crate::{CliError, Result};

/// Validate and evaluate, reporting every validation problem at once.
pub fn evaluate(calculator: &str, raw: &RawParameters) -> Result<ResultRecord> {
    let kind = CalculatorKind::from_name(calculator)
        .ok_or_else(|| CliError::UnknownCalculator(calculator.to_string()))?;
    let params = kind.schema().check_all(raw).map_err(CliError::Invalid)?;

    let defaulted: Vec<_> = params.defaulted().collect();
    if !defaulted.is_empty() {
        info!(calculator = %kind, defaulted = ?defaulted, "Applied schema defaults");
    }
    Ok(kind.evaluate(&params)?)
}

/// Build the evaluate output.
pub fn render(
    calculator: &str,
    params_file: Option<&Path>,
    assignments: &[String],
    format: OutputFormat,
) -> Result<String> {
    let base = match params_file {
        Some(path) => load_params(path)?,
        None => RawParameters::new(),
    };
    let raw = apply_assignments(base, assignments)?;
    let record = evaluate(calculator, &raw)?;

    match format {
        OutputFormat::Json => to_json(&record),
        OutputFormat::Table => Ok(record_table(&record)),
    }
}

/// Run the evaluate command
pub fn run(
    calculator: &str,
    params_file: Option<&Path>,
    assignments: &[String],
    format: OutputFormat,
) -> Result<()> {
    info!("Evaluating {}", calculator);
    print!("{}", render(calculator, params_file, assignments, format)?);
    Ok(())
}
