//! Portfolio-level aggregation of result records.
//!
//! This module provides:
//! - [`Statistic`]: a value, or `NoData` when nothing was aggregated
//! - [`PortfolioSummary`]: count, total, mean, min, max and weighted mean
//! - [`SummaryAccumulator`]: incremental summaries
//! - Batch helpers over record slices and scenario runs
//!
//! Every batch helper feeds an accumulator, so a summary built record by
//! record equals the batch summary of the same records.
//!
//! # Examples
//!
//! ```
//! use lcis_core::types::{Combination, RecordBuilder, Unit};
//! use lcis_portfolio::aggregation::{summarize, summarize_weighted, Statistic};
//!
//! let records: Vec<_> = [2.0, 4.0]
//!     .iter()
//!     .map(|&v| {
//!         RecordBuilder::new("carbon_credit", Unit::Credits, Combination::Product)
//!             .factor("credits", v)
//!             .build()
//!             .unwrap()
//!     })
//!     .collect();
//!
//! let summary = summarize(&records).unwrap();
//! assert_eq!(summary.mean, Statistic::Value(3.0));
//!
//! let weighted = summarize_weighted(&records, &[3.0, 1.0]).unwrap();
//! assert_eq!(weighted.weighted_mean, Some(Statistic::Value(2.5)));
//!
//! let empty = summarize(&[]).unwrap();
//! assert_eq!(empty.count, 0);
//! assert_eq!(empty.mean, Statistic::NoData);
//! ```

mod accumulator;

pub use accumulator::SummaryAccumulator;

use std::collections::BTreeMap;
use std::fmt;

use lcis_core::types::{ResultRecord, Unit};

use crate::error::AggregationError;
use crate::scenario::{ScenarioRun, StepEntry};

/// An aggregated statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Statistic {
    /// The statistic's value
    Value(f64),
    /// Nothing to aggregate
    NoData,
}

impl Statistic {
    /// The value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Statistic::Value(v) => Some(*v),
            Statistic::NoData => None,
        }
    }

    /// Returns true for `NoData`.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Statistic::NoData)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Value(v) => write!(f, "{}", v),
            Statistic::NoData => f.write_str("no data"),
        }
    }
}

/// Summary of the records of one metric.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioSummary {
    /// Metric summarised; `None` only for an empty input with no bound metric
    pub metric: Option<String>,
    /// Component rolled up, when not the final value
    pub component: Option<String>,
    /// Unit of the final values; `None` for components and empty input
    pub unit: Option<Unit>,
    /// Records aggregated
    pub count: usize,
    /// Failed steps excluded from the statistics
    pub failure_count: usize,
    /// Sum of values
    pub total: Statistic,
    /// Arithmetic mean
    pub mean: Statistic,
    /// Smallest value
    pub min: Statistic,
    /// Largest value
    pub max: Statistic,
    /// Weighted mean, present only when weights were supplied
    pub weighted_mean: Option<Statistic>,
}

/// Summarises records of one metric.
///
/// # Errors
///
/// `MixedMetrics` if the records do not all share the first record's metric,
/// and `NonFinite` if the total overflows.
pub fn summarize(records: &[ResultRecord]) -> Result<PortfolioSummary, AggregationError> {
    let mut acc = SummaryAccumulator::new();
    for record in records {
        acc.push(record)?;
    }
    Ok(acc.summary())
}

/// Summarises records of one metric with one weight per record.
///
/// # Errors
///
/// - `WeightCountMismatch` unless `weights.len() == records.len()`
/// - `InvalidWeight` for a negative or non-finite weight
/// - `MixedMetrics` as for [`summarize`]
pub fn summarize_weighted(
    records: &[ResultRecord],
    weights: &[f64],
) -> Result<PortfolioSummary, AggregationError> {
    if weights.len() != records.len() {
        return Err(AggregationError::WeightCountMismatch {
            expected: records.len(),
            found: weights.len(),
        });
    }

    let mut acc = SummaryAccumulator::new();
    acc.expect_weights();
    for (record, &weight) in records.iter().zip(weights) {
        acc.push_weighted(record, weight)?;
    }
    Ok(acc.summary())
}

/// Rolls up one named component (for example `quality_factor`) across
/// records of one metric.
///
/// # Errors
///
/// `MissingComponent` if a record lacks the component, and
/// `MixedMetrics` as for [`summarize`].
pub fn summarize_component(
    records: &[ResultRecord],
    component: &str,
) -> Result<PortfolioSummary, AggregationError> {
    let mut acc = SummaryAccumulator::for_component(component);
    for record in records {
        acc.push(record)?;
    }
    Ok(acc.summary())
}

/// Groups records by metric and summarises each group.
pub fn summarize_by_metric(
    records: &[ResultRecord],
) -> Result<BTreeMap<String, PortfolioSummary>, AggregationError> {
    let mut groups: BTreeMap<&str, SummaryAccumulator> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.metric())
            .or_insert_with(|| SummaryAccumulator::for_metric(record.metric()))
            .push(record)?;
    }
    Ok(groups
        .into_iter()
        .map(|(metric, acc)| (metric.to_string(), acc.summary()))
        .collect())
}

/// Summarises a scenario run; failed steps are counted, not aggregated.
///
/// # Errors
///
/// `MixedMetrics` if a record does not carry the run's metric.
pub fn summarize_run(run: &ScenarioRun) -> Result<PortfolioSummary, AggregationError> {
    let mut acc = SummaryAccumulator::for_metric(run.metric());
    for entry in run.entries() {
        match entry {
            StepEntry::Completed { record, .. } => acc.push(record)?,
            StepEntry::Failed(_) => acc.record_failure(),
        }
    }
    let summary = acc.summary();
    log_summary(run, &summary);
    Ok(summary)
}

/// Summarises a scenario run with one weight per step.
///
/// Weights are indexed by step, so `weights[i]` belongs to step `i`; the
/// weights of failed steps are skipped.
///
/// # Errors
///
/// - `WeightCountMismatch` unless `weights.len() == run.len()`
/// - `InvalidWeight` for a negative or non-finite weight of a completed step
/// - `MixedMetrics` as for [`summarize_run`]
pub fn summarize_run_weighted(
    run: &ScenarioRun,
    weights: &[f64],
) -> Result<PortfolioSummary, AggregationError> {
    if weights.len() != run.len() {
        return Err(AggregationError::WeightCountMismatch {
            expected: run.len(),
            found: weights.len(),
        });
    }

    let mut acc = SummaryAccumulator::for_metric(run.metric());
    acc.expect_weights();
    for (entry, &weight) in run.entries().iter().zip(weights) {
        match entry {
            StepEntry::Completed { record, .. } => acc.push_weighted(record, weight)?,
            StepEntry::Failed(_) => acc.record_failure(),
        }
    }
    let summary = acc.summary();
    log_summary(run, &summary);
    Ok(summary)
}

fn log_summary(run: &ScenarioRun, summary: &PortfolioSummary) {
    tracing::debug!(
        scenario = run.scenario(),
        metric = run.metric(),
        count = summary.count,
        failures = summary.failure_count,
        mean = %summary.mean,
        "run summarised"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lcis_core::types::{Combination, RecordBuilder};

    fn record(metric: &str, value: f64) -> ResultRecord {
        RecordBuilder::new(metric, Unit::Score, Combination::Product)
            .factor("x", value)
            .build()
            .unwrap()
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]).unwrap();
        assert_eq!(summary.count, 0);
        assert!(summary.total.is_no_data());
        assert!(summary.mean.is_no_data());
        assert!(summary.min.is_no_data());
        assert!(summary.max.is_no_data());
    }

    #[test]
    fn test_summarize_weighted_empty() {
        let summary = summarize_weighted(&[], &[]).unwrap();
        assert_eq!(summary.weighted_mean, Some(Statistic::NoData));
    }

    #[test]
    fn test_summarize_mixed_metrics() {
        let records = vec![record("a", 1.0), record("b", 2.0)];
        assert!(matches!(
            summarize(&records),
            Err(AggregationError::MixedMetrics { index: 1, .. })
        ));
    }

    #[test]
    fn test_weight_count_mismatch() {
        let records = vec![record("a", 1.0), record("a", 2.0)];
        assert_eq!(
            summarize_weighted(&records, &[1.0]),
            Err(AggregationError::WeightCountMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_summarize_overflow_is_an_error() {
        let records = vec![record("a", 1e308), record("a", 1e308)];
        assert_eq!(
            summarize(&records),
            Err(AggregationError::NonFinite {
                statistic: "total",
                index: 1,
            })
        );
    }

    #[test]
    fn test_batch_equals_incremental() {
        let values = [0.3, 1.7, 0.2, 9.4, 3.3];
        let records: Vec<_> = values.iter().map(|&v| record("a", v)).collect();

        let mut acc = SummaryAccumulator::new();
        for r in &records {
            acc.push(r).unwrap();
        }
        assert_eq!(summarize(&records).unwrap(), acc.summary());
    }

    #[test]
    fn test_summarize_by_metric() {
        let records = vec![
            record("b", 1.0),
            record("a", 2.0),
            record("b", 3.0),
        ];
        let groups = summarize_by_metric(&records).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["a"].count, 1);
        assert_eq!(groups["b"].count, 2);
        assert_eq!(groups["b"].mean, Statistic::Value(2.0));
    }

    #[test]
    fn test_weighted_mean_values() {
        let records = vec![record("a", 1.0), record("a", 2.0), record("a", 4.0)];
        let summary = summarize_weighted(&records, &[0.5, 0.25, 0.25]).unwrap();
        let mean = summary.weighted_mean.and_then(|s| s.value()).unwrap();
        assert_relative_eq!(mean, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_statistic_display() {
        assert_eq!(Statistic::Value(1.5).to_string(), "1.5");
        assert_eq!(Statistic::NoData.to_string(), "no data");
    }
}
