//! Runner and aggregation error types.
//!
//! This module provides structured error types for scenario runs and
//! portfolio aggregation using `thiserror` for derivation.

use thiserror::Error;

use crate::scenario::StepFailure;

/// Errors that abort a scenario run.
///
/// Per-step failures are normally recorded in the run; they only become a
/// `RunError` under [`FailurePolicy::FailFast`](crate::scenario::FailurePolicy::FailFast).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    /// The first failing step by position, under fail-fast.
    #[error("Run aborted: {0}")]
    StepFailed(#[from] StepFailure),
}

/// Errors from reducing records into a portfolio summary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    /// A record's metric differs from the metric being summarised.
    #[error("Record {index} has metric '{found}', expected '{expected}'")]
    MixedMetrics {
        /// Metric the summary is bound to
        expected: String,
        /// Metric of the offending record
        found: String,
        /// Position of the offending record
        index: usize,
    },

    /// Weights do not line up with the records.
    #[error("Weight count mismatch: expected {expected}, got {found}")]
    WeightCountMismatch {
        /// Number of weights required
        expected: usize,
        /// Number of weights supplied
        found: usize,
    },

    /// A weight is negative or not finite.
    #[error("Weight at index {index} must be finite and non-negative, got {weight}")]
    InvalidWeight {
        /// Position of the offending weight
        index: usize,
        /// The offending weight
        weight: f64,
    },

    /// A component rollup found a record without that component.
    #[error("Record {index} ('{metric}') has no component '{name}'")]
    MissingComponent {
        /// Component being rolled up
        name: String,
        /// Metric of the offending record
        metric: String,
        /// Position of the offending record
        index: usize,
    },

    /// A running sum overflowed; the record that caused it was not added.
    #[error("Running {statistic} is not finite after record {index}")]
    NonFinite {
        /// Sum that overflowed
        statistic: &'static str,
        /// Position of the offending record
        index: usize,
    },
}
