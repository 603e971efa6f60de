//! Incremental summary accumulator.
//!
//! [`SummaryAccumulator`] is the only place statistics are computed; the
//! batch functions in the parent module feed records through it, so batch
//! and incremental summaries agree by construction.

use lcis_core::types::{ResultRecord, Unit};

use super::{PortfolioSummary, Statistic};
use crate::error::AggregationError;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct WeightedSums {
    weighted_total: f64,
    weight_total: f64,
}

/// Running statistics over a stream of result records.
///
/// The accumulator binds to the first metric it sees (or to the metric
/// given at construction) and rejects records of any other metric. It is
/// either unweighted or weighted for its whole life: the first push
/// decides, and mixing the two is a weight count mismatch.
///
/// # Examples
///
/// ```
/// use lcis_core::types::{Combination, RecordBuilder, Unit};
/// use lcis_portfolio::aggregation::{Statistic, SummaryAccumulator};
///
/// let record = |v: f64| {
///     RecordBuilder::new("demo", Unit::Score, Combination::Product)
///         .factor("x", v)
///         .build()
///         .unwrap()
/// };
///
/// let mut acc = SummaryAccumulator::new();
/// acc.push(&record(1.0)).unwrap();
/// acc.push(&record(3.0)).unwrap();
/// acc.record_failure();
///
/// let summary = acc.summary();
/// assert_eq!(summary.count, 2);
/// assert_eq!(summary.failure_count, 1);
/// assert_eq!(summary.mean, Statistic::Value(2.0));
/// assert_eq!(summary.weighted_mean, None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryAccumulator {
    metric: Option<String>,
    component: Option<String>,
    unit: Option<Unit>,
    count: usize,
    failure_count: usize,
    total: f64,
    min: f64,
    max: f64,
    weighted: Option<WeightedSums>,
}

impl Default for SummaryAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryAccumulator {
    /// Accumulator bound to the metric of the first record pushed.
    pub fn new() -> Self {
        Self {
            metric: None,
            component: None,
            unit: None,
            count: 0,
            failure_count: 0,
            total: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            weighted: None,
        }
    }

    /// Accumulator bound to `metric` up front.
    pub fn for_metric(metric: impl Into<String>) -> Self {
        Self {
            metric: Some(metric.into()),
            ..Self::new()
        }
    }

    /// Accumulator over the named component instead of the final value.
    ///
    /// Summaries of a component carry no unit.
    pub fn for_component(name: impl Into<String>) -> Self {
        Self {
            component: Some(name.into()),
            ..Self::new()
        }
    }

    /// Adds one record.
    ///
    /// # Errors
    ///
    /// - `MixedMetrics` if the record's metric differs from the bound one
    /// - `MissingComponent` in component mode if the record lacks it
    /// - `WeightCountMismatch` if earlier records were weighted
    /// - `NonFinite` if the running total would overflow
    ///
    /// A rejected record leaves the accumulator unchanged.
    pub fn push(&mut self, record: &ResultRecord) -> Result<(), AggregationError> {
        if self.weighted.is_some() {
            return Err(AggregationError::WeightCountMismatch {
                expected: self.count + 1,
                found: self.count,
            });
        }
        let value = self.admit(record)?;
        let total = self.finite("total", self.total + value)?;
        self.observe(record, value, total);
        Ok(())
    }

    /// Adds one record with its weight.
    ///
    /// # Errors
    ///
    /// As [`push`](Self::push), plus `InvalidWeight` for a negative or
    /// non-finite weight, `WeightCountMismatch` if earlier records were
    /// unweighted, and `NonFinite` if either weighted sum would overflow.
    pub fn push_weighted(
        &mut self,
        record: &ResultRecord,
        weight: f64,
    ) -> Result<(), AggregationError> {
        if self.weighted.is_none() && self.count > 0 {
            return Err(AggregationError::WeightCountMismatch {
                expected: self.count + 1,
                found: 1,
            });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(AggregationError::InvalidWeight {
                index: self.position(),
                weight,
            });
        }
        let value = self.admit(record)?;
        let total = self.finite("total", self.total + value)?;

        let sums = self.weighted.unwrap_or_default();
        let sums = WeightedSums {
            weighted_total: self.finite("weighted total", sums.weighted_total + weight * value)?,
            weight_total: self.finite("weight total", sums.weight_total + weight)?,
        };
        self.weighted = Some(sums);
        self.observe(record, value, total);
        Ok(())
    }

    /// Counts a failed step; failures take no part in the statistics.
    pub fn record_failure(&mut self) {
        self.failure_count += 1;
    }

    /// Marks the accumulator as weighted before any record arrives, so an
    /// empty input still reports a weighted mean (of `NoData`).
    pub(crate) fn expect_weights(&mut self) {
        if self.count == 0 {
            self.weighted.get_or_insert_with(WeightedSums::default);
        }
    }

    /// Number of records accumulated.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Summary of everything pushed so far.
    pub fn summary(&self) -> PortfolioSummary {
        let stat = |x: f64| {
            if self.count == 0 {
                Statistic::NoData
            } else {
                Statistic::Value(x)
            }
        };

        PortfolioSummary {
            metric: self.metric.clone(),
            component: self.component.clone(),
            unit: self.unit,
            count: self.count,
            failure_count: self.failure_count,
            total: stat(self.total),
            mean: stat(self.total / self.count as f64),
            min: stat(self.min),
            max: stat(self.max),
            weighted_mean: self.weighted.map(|sums| {
                if sums.weight_total > 0.0 {
                    Statistic::Value(sums.weighted_total / sums.weight_total)
                } else {
                    Statistic::NoData
                }
            }),
        }
    }

    fn position(&self) -> usize {
        self.count + self.failure_count
    }

    /// Checks the record against the bound metric and extracts its value.
    fn admit(&self, record: &ResultRecord) -> Result<f64, AggregationError> {
        if let Some(expected) = &self.metric {
            if expected.as_str() != record.metric() {
                return Err(AggregationError::MixedMetrics {
                    expected: expected.clone(),
                    found: record.metric().to_string(),
                    index: self.position(),
                });
            }
        }

        let value = match &self.component {
            None => record.final_value(),
            Some(name) => {
                record
                    .component(name)
                    .ok_or_else(|| AggregationError::MissingComponent {
                        name: name.clone(),
                        metric: record.metric().to_string(),
                        index: self.position(),
                    })?
            }
        };
        Ok(value)
    }

    fn finite(&self, statistic: &'static str, sum: f64) -> Result<f64, AggregationError> {
        if sum.is_finite() {
            Ok(sum)
        } else {
            Err(AggregationError::NonFinite {
                statistic,
                index: self.position(),
            })
        }
    }

    /// Commits an admitted record; `total` already includes `value`.
    fn observe(&mut self, record: &ResultRecord, value: f64, total: f64) {
        if self.metric.is_none() {
            self.metric = Some(record.metric().to_string());
        }
        if self.component.is_none() && self.unit.is_none() {
            self.unit = Some(record.unit());
        }
        self.count += 1;
        self.total = total;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}
