//! Per-step outcomes of a scenario run.

use lcis_core::types::{EvaluationError, ResultRecord};
use thiserror::Error;

use super::StepKey;

/// A step whose validation or evaluation failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("Step {index} ({key}) failed: {error}")]
pub struct StepFailure {
    /// Position of the step in the scenario
    pub index: usize,
    /// Key of the step
    pub key: StepKey,
    /// Why the step failed
    #[source]
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_error"))]
    pub error: EvaluationError,
}

#[cfg(feature = "serde")]
fn serialize_error<S>(error: &EvaluationError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeStruct;

    let mut state = serializer.serialize_struct("EvaluationError", 2)?;
    state.serialize_field("category", error.category())?;
    state.serialize_field("message", &error.to_string())?;
    state.end()
}

/// Outcome of one step, at the step's position in the run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum StepEntry {
    /// The step produced a record.
    Completed {
        /// Position of the step in the scenario
        index: usize,
        /// Key of the step
        key: StepKey,
        /// The step's result
        record: ResultRecord,
    },
    /// The step failed.
    Failed(StepFailure),
}

impl StepEntry {
    /// Position of the step in the scenario.
    pub fn index(&self) -> usize {
        match self {
            StepEntry::Completed { index, .. } => *index,
            StepEntry::Failed(failure) => failure.index,
        }
    }

    /// Key of the step.
    pub fn key(&self) -> &StepKey {
        match self {
            StepEntry::Completed { key, .. } => key,
            StepEntry::Failed(failure) => &failure.key,
        }
    }

    /// The record, if the step completed.
    pub fn record(&self) -> Option<&ResultRecord> {
        match self {
            StepEntry::Completed { record, .. } => Some(record),
            StepEntry::Failed(_) => None,
        }
    }

    /// The failure, if the step failed.
    pub fn failure(&self) -> Option<&StepFailure> {
        match self {
            StepEntry::Completed { .. } => None,
            StepEntry::Failed(failure) => Some(failure),
        }
    }

    /// Returns true if the step produced a record.
    pub fn is_completed(&self) -> bool {
        matches!(self, StepEntry::Completed { .. })
    }
}

/// Ordered outcomes of running one calculator over a scenario.
///
/// `entries()[i]` belongs to step `i` of the scenario. A cancelled run
/// holds only the prefix of steps that ran before cancellation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScenarioRun {
    scenario: String,
    metric: String,
    entries: Vec<StepEntry>,
    cancelled: bool,
}

impl ScenarioRun {
    pub(crate) fn new(
        scenario: impl Into<String>,
        metric: impl Into<String>,
        entries: Vec<StepEntry>,
        cancelled: bool,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            metric: metric.into(),
            entries,
            cancelled,
        }
    }

    /// Name of the scenario that was run.
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Metric of the calculator that was run.
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Per-step outcomes in step order.
    pub fn entries(&self) -> &[StepEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no step ran.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the run stopped early on request.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Records of completed steps, in step order.
    pub fn records(&self) -> impl Iterator<Item = &ResultRecord> {
        self.entries.iter().filter_map(StepEntry::record)
    }

    /// Failures, in step order.
    pub fn failures(&self) -> impl Iterator<Item = &StepFailure> {
        self.entries.iter().filter_map(StepEntry::failure)
    }

    /// Number of completed steps.
    pub fn completed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_completed()).count()
    }

    /// Number of failed steps.
    pub fn failure_count(&self) -> usize {
        self.entries.len() - self.completed_count()
    }
}
