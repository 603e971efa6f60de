//! TOML input files and `--set` overrides.
//!
//! A scenario file names its calculator, optional shared parameters and an
//! ordered list of steps:
//!
//! ```toml
//! name = "energy sweep"
//! calculator = "carbon_credit"
//!
//! [shared]
//! efficiency = 0.92
//!
//! [[step]]
//! t = 0
//! weight = 2.0
//! inputs = { energy_delivered = 10 }
//! ```
//!
//! A step is keyed by `t` or `asset`; with neither it is keyed by its
//! position. Weights are all-or-nothing across steps.

use std::path::Path;

use lcis_core::types::{ParamValue, RawParameters};
use lcis_models::calculators::CalculatorKind;
use lcis_portfolio::scenario::{Scenario, StepKey};
use serde::Deserialize;

use crate::error::{CliError, Result};

/// Scenario file as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    /// Scenario name; defaults to the file stem
    #[serde(default)]
    pub name: Option<String>,
    /// Stable calculator name
    pub calculator: String,
    /// Parameters shared by every step
    #[serde(default)]
    pub shared: RawParameters,
    /// Ordered steps
    #[serde(default)]
    pub step: Vec<StepFile>,
}

/// One step of a scenario file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepFile {
    /// Time index
    #[serde(default)]
    pub t: Option<u64>,
    /// Asset identifier
    #[serde(default)]
    pub asset: Option<String>,
    /// Weight for the weighted mean
    #[serde(default)]
    pub weight: Option<f64>,
    /// Step-specific inputs, layered over `shared`
    #[serde(default)]
    pub inputs: RawParameters,
}

/// A scenario file resolved into engine types.
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    /// Calculator to run
    pub calculator: CalculatorKind,
    /// Scenario to run it over
    pub scenario: Scenario,
    /// Per-step weights, when every step has one
    pub weights: Option<Vec<f64>>,
}

impl ScenarioFile {
    /// Resolve names and keys, checking weight consistency.
    ///
    /// # Arguments
    /// * `fallback_name` - used when the file has no `name`
    ///
    /// # Errors
    /// `UnknownCalculator` for an unknown name, `InvalidArgument` for a step
    /// with both `t` and `asset` or for partial weights.
    pub fn resolve(self, fallback_name: &str) -> Result<LoadedScenario> {
        let calculator = CalculatorKind::from_name(&self.calculator)
            .ok_or_else(|| CliError::UnknownCalculator(self.calculator.clone()))?;

        let name = self.name.unwrap_or_else(|| fallback_name.to_string());
        let mut scenario = Scenario::new(name).with_shared(self.shared);

        let weighted = self.step.iter().filter(|s| s.weight.is_some()).count();
        if weighted != 0 && weighted != self.step.len() {
            return Err(CliError::InvalidArgument(format!(
                "{} of {} steps have a weight; give every step a weight or none",
                weighted,
                self.step.len()
            )));
        }

        let mut weights = Vec::with_capacity(weighted);
        for (index, step) in self.step.into_iter().enumerate() {
            let key = match (step.t, step.asset) {
                (Some(_), Some(_)) => {
                    return Err(CliError::InvalidArgument(format!(
                        "step {} has both `t` and `asset`",
                        index
                    )))
                }
                (Some(t), None) => StepKey::Time(t),
                (None, Some(asset)) => StepKey::Asset(asset),
                (None, None) => StepKey::Time(index as u64),
            };
            if let Some(w) = step.weight {
                weights.push(w);
            }
            scenario.push_step(key, step.inputs);
        }

        Ok(LoadedScenario {
            calculator,
            scenario,
            weights: (weighted > 0).then_some(weights),
        })
    }
}

fn read_to_string(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and resolve a scenario file.
pub fn load_scenario(path: &Path) -> Result<LoadedScenario> {
    let content = read_to_string(path)?;
    let file: ScenarioFile = toml::from_str(&content).map_err(|e| CliError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scenario".to_string());
    file.resolve(&stem)
}

/// Load a flat parameter file (one TOML table of name = value).
pub fn load_params(path: &Path) -> Result<RawParameters> {
    let content = read_to_string(path)?;
    toml::from_str(&content).map_err(|e| CliError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse a `name=value` override.
///
/// The value is a number if it parses as one, a series for a
/// comma-separated list of numbers, labels for any other comma-separated
/// list, and text otherwise.
pub fn parse_assignment(assignment: &str) -> Result<(String, ParamValue)> {
    let (name, raw) = assignment.split_once('=').ok_or_else(|| {
        CliError::InvalidArgument(format!("expected name=value, got '{}'", assignment))
    })?;
    let name = name.trim();
    let raw = raw.trim();
    if name.is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "missing parameter name in '{}'",
            assignment
        )));
    }

    let value = if let Ok(number) = raw.parse::<f64>() {
        ParamValue::Number(number)
    } else if raw.contains(',') {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        let numbers: std::result::Result<Vec<f64>, _> =
            parts.iter().map(|p| p.parse::<f64>()).collect();
        match numbers {
            Ok(series) => ParamValue::Series(series),
            Err(_) => ParamValue::Labels(parts.iter().map(|p| p.to_string()).collect()),
        }
    } else {
        ParamValue::Text(raw.to_string())
    };

    Ok((name.to_string(), value))
}

/// Apply `--set` overrides on top of `base`; later assignments win.
pub fn apply_assignments(mut base: RawParameters, assignments: &[String]) -> Result<RawParameters> {
    for assignment in assignments {
        let (name, value) = parse_assignment(assignment)?;
        base.insert(name, value);
    }
    Ok(base)
}
