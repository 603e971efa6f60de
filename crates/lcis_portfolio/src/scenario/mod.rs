//! Scenarios and the scenario runner.
//!
//! This module provides:
//! - [`StepKey`]: identifies a step as a time index or an asset
//! - [`Scenario`]: shared inputs plus an ordered list of steps
//! - [`ScenarioRunner`]: evaluates a calculator over every step
//! - [`ScenarioRun`]: the ordered per-step outcomes
//!
//! Step order is significant: it is preserved from construction through
//! to the run and its summary.

mod outcome;
mod runner;

pub use outcome::{ScenarioRun, StepEntry, StepFailure};
pub use runner::{FailurePolicy, RunnerConfig, ScenarioRunner};

use std::fmt;

use lcis_core::types::RawParameters;

/// Identifies one step of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StepKey {
    /// Position in a time series
    Time(u64),
    /// Member of an asset population
    Asset(String),
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKey::Time(t) => write!(f, "t={}", t),
            StepKey::Asset(id) => write!(f, "asset={}", id),
        }
    }
}

/// One step: its key and the inputs specific to it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioStep {
    /// Step identity
    pub key: StepKey,
    /// Step inputs, layered over the scenario's shared inputs
    pub inputs: RawParameters,
}

/// A named sequence of steps sharing a base set of inputs.
///
/// # Examples
///
/// ```
/// use lcis_core::types::RawParameters;
/// use lcis_portfolio::scenario::{Scenario, StepKey};
///
/// let scenario = Scenario::new("fleet")
///     .with_shared(RawParameters::new().with("efficiency", 0.92))
///     .asset("BUS_01", RawParameters::new().with("energy_delivered", 40.0))
///     .asset("BUS_02", RawParameters::new().with("efficiency", 0.85));
///
/// assert_eq!(scenario.len(), 2);
/// assert_eq!(scenario.steps()[1].key, StepKey::Asset("BUS_02".to_string()));
///
/// let merged = scenario.merged_inputs(1).unwrap();
/// assert_eq!(merged.get("efficiency").and_then(|v| v.as_number()), Some(0.85));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    shared: RawParameters,
    #[cfg_attr(feature = "serde", serde(default))]
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Creates an empty scenario.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: RawParameters::new(),
            steps: Vec::new(),
        }
    }

    /// Sets the inputs shared by every step.
    pub fn with_shared(mut self, shared: RawParameters) -> Self {
        self.shared = shared;
        self
    }

    /// Appends a time step.
    pub fn time_step(mut self, t: u64, inputs: RawParameters) -> Self {
        self.push_step(StepKey::Time(t), inputs);
        self
    }

    /// Appends an asset step.
    pub fn asset(mut self, id: impl Into<String>, inputs: RawParameters) -> Self {
        self.push_step(StepKey::Asset(id.into()), inputs);
        self
    }

    /// Appends a step.
    pub fn push_step(&mut self, key: StepKey, inputs: RawParameters) {
        self.steps.push(ScenarioStep { key, inputs });
    }

    /// Scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inputs shared by every step.
    pub fn shared(&self) -> &RawParameters {
        &self.shared
    }

    /// Steps in insertion order.
    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if there are no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Inputs of step `index` layered over the shared inputs.
    pub fn merged_inputs(&self, index: usize) -> Option<RawParameters> {
        self.steps
            .get(index)
            .map(|step| step.inputs.layered_over(&self.shared))
    }
}
