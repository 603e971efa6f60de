//! Immutable, auditable result records.
//!
//! A `ResultRecord` carries the final value of one calculator evaluation
//! together with every factor that produced it and the closed-form rule
//! that combines them. The final value is computed from the factors by
//! [`RecordBuilder::build`], so a record can always be re-derived from
//! its own components.

use std::collections::HashSet;
use std::fmt;

use super::error::ComputationError;
use crate::math::clamp_range;

/// Unit of a metric's final value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    /// Carbon credits
    #[cfg_attr(feature = "serde", serde(rename = "credits"))]
    Credits,
    /// Charging C-rate
    #[cfg_attr(feature = "serde", serde(rename = "C"))]
    CRate,
    /// Dimensionless score
    #[cfg_attr(feature = "serde", serde(rename = "score"))]
    Score,
    /// US dollars
    #[cfg_attr(feature = "serde", serde(rename = "USD"))]
    Usd,
}

impl Unit {
    /// Short symbol used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Credits => "credits",
            Unit::CRate => "C",
            Unit::Score => "score",
            Unit::Usd => "USD",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a component takes part in the combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ComponentRole {
    /// Combined into the final value
    Factor,
    /// Reported for explainability only
    Diagnostic,
}

/// A named intermediate value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    /// Component name, unique within a record
    pub name: String,
    /// Finite value
    pub value: f64,
    /// Factor or diagnostic
    pub role: ComponentRole,
}

/// One labelled contribution to a `BreakdownSum`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakdownEntry {
    /// Asset label
    pub label: String,
    /// Contribution to the total
    pub value: f64,
}

/// Closed-form rule combining a record's factors into its final value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "rule", rename_all = "snake_case"))]
pub enum Combination {
    /// Product of all factors
    Product,
    /// Product of all factors, clamped into `[min, max]`
    ClampedProduct {
        /// Lower edge of the band
        min: f64,
        /// Upper edge of the band
        max: f64,
    },
    /// Product of all factors except `denominator`, divided by it
    Quotient {
        /// Name of the divisor factor
        denominator: String,
    },
    /// Sum of all factors
    Sum,
    /// Sum of the breakdown entries
    BreakdownSum,
}

/// Result of applying a combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combined {
    /// Final value
    pub value: f64,
    /// Value before any clamping
    pub unclamped: f64,
    /// Whether clamping changed the value
    pub clamped: bool,
}

impl Combination {
    /// Applies the rule to the factor components and breakdown.
    ///
    /// Components whose role is `Diagnostic` are ignored.
    pub fn apply(
        &self,
        components: &[Component],
        breakdown: &[BreakdownEntry],
    ) -> Result<Combined, ComputationError> {
        let factors = components
            .iter()
            .filter(|c| c.role == ComponentRole::Factor);

        let unclamped = match self {
            Combination::Product | Combination::ClampedProduct { .. } => {
                factors.map(|c| c.value).product::<f64>()
            }
            Combination::Sum => factors.map(|c| c.value).sum::<f64>(),
            Combination::BreakdownSum => breakdown.iter().map(|e| e.value).sum::<f64>(),
            Combination::Quotient { denominator } => {
                let mut divisor = None;
                let mut numerator = 1.0;
                for c in factors {
                    if &c.name == denominator {
                        divisor = Some(c.value);
                    } else {
                        numerator *= c.value;
                    }
                }
                let divisor = divisor.ok_or_else(|| ComputationError::MissingFactor {
                    name: denominator.clone(),
                })?;
                numerator / divisor
            }
        };

        let value = match self {
            Combination::ClampedProduct { min, max } => clamp_range(unclamped, *min, *max),
            _ => unclamped,
        };

        Ok(Combined {
            value,
            unclamped,
            clamped: value != unclamped && !unclamped.is_nan(),
        })
    }

    /// Short rule name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Combination::Product => "product",
            Combination::ClampedProduct { .. } => "clamped_product",
            Combination::Quotient { .. } => "quotient",
            Combination::Sum => "sum",
            Combination::BreakdownSum => "breakdown_sum",
        }
    }
}

/// Output of one calculator evaluation.
///
/// Only constructed through [`RecordBuilder`], which guarantees that all
/// values are finite, component names are unique and `final_value` equals
/// the combination applied to the factors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultRecord {
    metric: String,
    final_value: f64,
    unit: Unit,
    components: Vec<Component>,
    combination: Combination,
    confidence: Option<f64>,
    clamped: bool,
    breakdown: Vec<BreakdownEntry>,
    warnings: Vec<String>,
}

impl ResultRecord {
    /// Metric name (the calculator's stable name).
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Final value.
    pub fn final_value(&self) -> f64 {
        self.final_value
    }

    /// Unit of the final value.
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// All components in insertion order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Combination rule.
    pub fn combination(&self) -> &Combination {
        &self.combination
    }

    /// Confidence in [0, 1], when the metric reports one.
    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// Whether the final value was clamped into its band.
    pub fn clamped(&self) -> bool {
        self.clamped
    }

    /// Per-asset breakdown in input order.
    pub fn breakdown(&self) -> &[BreakdownEntry] {
        &self.breakdown
    }

    /// Warning-level notes.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Looks up a component value by name.
    pub fn component(&self, name: &str) -> Option<f64> {
        self.components
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value)
    }

    /// Iterates the factor components.
    pub fn factors(&self) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(|c| c.role == ComponentRole::Factor)
    }

    /// Iterates the diagnostic components.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(|c| c.role == ComponentRole::Diagnostic)
    }

    /// Re-applies the combination to the stored factors.
    pub fn recompute(&self) -> Result<f64, ComputationError> {
        self.combination
            .apply(&self.components, &self.breakdown)
            .map(|c| c.value)
    }

    /// Checks that the stored final value matches a recomputation within
    /// `tolerance` (absolute).
    pub fn verify(&self, tolerance: f64) -> bool {
        match self.recompute() {
            Ok(v) => (v - self.final_value).abs() <= tolerance,
            Err(_) => false,
        }
    }
}

/// Builder for [`ResultRecord`].
///
/// # Examples
/// ```
/// use lcis_core::types::{Combination, RecordBuilder, Unit};
///
/// let record = RecordBuilder::new("example", Unit::Score, Combination::Product)
///     .factor("a", 0.5)
///     .factor("b", 0.8)
///     .diagnostic("note", 3.0)
///     .build()
///     .unwrap();
///
/// assert!((record.final_value() - 0.4).abs() < 1e-12);
/// assert_eq!(record.component("note"), Some(3.0));
/// assert!(record.verify(1e-12));
/// ```
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    metric: String,
    unit: Unit,
    combination: Combination,
    components: Vec<Component>,
    confidence: Option<f64>,
    breakdown: Vec<BreakdownEntry>,
    warnings: Vec<String>,
}

impl RecordBuilder {
    /// Starts a record for `metric`.
    pub fn new(metric: impl Into<String>, unit: Unit, combination: Combination) -> Self {
        Self {
            metric: metric.into(),
            unit,
            combination,
            components: Vec::new(),
            confidence: None,
            breakdown: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds a factor component.
    pub fn factor(self, name: impl Into<String>, value: f64) -> Self {
        self.component(name, value, ComponentRole::Factor)
    }

    /// Adds a diagnostic component.
    pub fn diagnostic(self, name: impl Into<String>, value: f64) -> Self {
        self.component(name, value, ComponentRole::Diagnostic)
    }

    fn component(mut self, name: impl Into<String>, value: f64, role: ComponentRole) -> Self {
        self.components.push(Component {
            name: name.into(),
            value,
            role,
        });
        self
    }

    /// Sets the record confidence.
    pub fn confidence(mut self, value: f64) -> Self {
        self.confidence = Some(value);
        self
    }

    /// Appends a breakdown entry.
    pub fn breakdown_entry(mut self, label: impl Into<String>, value: f64) -> Self {
        self.breakdown.push(BreakdownEntry {
            label: label.into(),
            value,
        });
        self
    }

    /// Appends a warning.
    pub fn warning(mut self, message: impl Into<String>) -> Self {
        self.warnings.push(message.into());
        self
    }

    /// Validates and freezes the record, computing its final value.
    ///
    /// # Errors
    /// - `DuplicateComponent` if two components share a name
    /// - `NonFinite` for a non-finite component, breakdown entry or result
    /// - `InvalidConfidence` for a confidence outside [0, 1]
    /// - `MissingFactor` if a `Quotient` denominator was never added
    pub fn build(self) -> Result<ResultRecord, ComputationError> {
        let mut seen = HashSet::with_capacity(self.components.len());
        for c in &self.components {
            if !seen.insert(c.name.as_str()) {
                return Err(ComputationError::DuplicateComponent {
                    name: c.name.clone(),
                });
            }
            if !c.value.is_finite() {
                return Err(ComputationError::NonFinite {
                    name: c.name.clone(),
                    value: c.value,
                });
            }
        }

        for e in &self.breakdown {
            if !e.value.is_finite() {
                return Err(ComputationError::NonFinite {
                    name: e.label.clone(),
                    value: e.value,
                });
            }
        }

        if let Some(conf) = self.confidence {
            if !(0.0..=1.0).contains(&conf) {
                return Err(ComputationError::InvalidConfidence { value: conf });
            }
        }

        let combined = self.combination.apply(&self.components, &self.breakdown)?;
        // Check the pre-clamp value too so a clamp cannot mask an overflow.
        if !combined.unclamped.is_finite() || !combined.value.is_finite() {
            return Err(ComputationError::NonFinite {
                name: self.metric.clone(),
                value: combined.unclamped,
            });
        }

        Ok(ResultRecord {
            metric: self.metric,
            final_value: combined.value,
            unit: self.unit,
            components: self.components,
            combination: self.combination,
            confidence: self.confidence,
            clamped: combined.clamped,
            breakdown: self.breakdown,
            warnings: self.warnings,
        })
    }
}
