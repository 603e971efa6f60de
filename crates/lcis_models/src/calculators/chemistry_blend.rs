//! Lithium-ion / sodium-ion chemistry blend score.
//!
//! ```text
//! score = α × Li_perf × li_ratio + β × Na_perf × na_ratio
//!       + γ × integration_bonus × 2 × min(li_ratio, na_ratio)
//! ```
//!
//! Ratios come from the two installed capacities. Cost diagnostics follow
//! the per-kWh costs of each chemistry.

use lcis_core::schema::{Domain, FieldSpec, InputSchema};
use lcis_core::traits::Calculator;
use lcis_core::types::{
    Combination, DomainError, EvaluationError, ParameterSet, RecordBuilder, ResultRecord, Unit,
};

/// Default weight of the lithium term.
pub const DEFAULT_ALPHA: f64 = 0.6;
/// Default weight of the sodium term.
pub const DEFAULT_BETA: f64 = 0.3;
/// Default weight of the integration term.
pub const DEFAULT_GAMMA: f64 = 0.1;
/// Default relative lithium-ion performance.
pub const DEFAULT_LI_PERFORMANCE: f64 = 1.0;
/// Default relative sodium-ion performance.
pub const DEFAULT_NA_PERFORMANCE: f64 = 0.75;
/// Default bonus for mixing chemistries.
pub const DEFAULT_INTEGRATION_BONUS: f64 = 0.1;
/// Default lithium-ion cost in USD per kWh.
pub const DEFAULT_LI_COST_PER_KWH: f64 = 150.0;
/// Default sodium-ion cost in USD per kWh.
pub const DEFAULT_NA_COST_PER_KWH: f64 = 80.0;
/// Default performance target.
pub const DEFAULT_PERFORMANCE_TARGET: f64 = 0.85;

const TARGET_MET_MULTIPLIER: f64 = 1.2;
const TARGET_MISSED_MULTIPLIER: f64 = 0.8;

/// Chemistry-blend calculator.
///
/// # Examples
/// ```
/// use lcis_core::traits::Calculator;
/// use lcis_core::types::RawParameters;
/// use lcis_models::calculators::ChemistryBlend;
///
/// let raw = RawParameters::new()
///     .with("li_capacity", 80.0)
///     .with("na_capacity", 20.0);
///
/// let record = ChemistryBlend.evaluate_raw(&raw).unwrap();
/// let expected = 0.6 * 0.8 + 0.3 * 0.75 * 0.2 + 0.1 * 0.1 * 2.0 * 0.2;
/// assert!((record.final_value() - expected).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChemistryBlend;

impl ChemistryBlend {
    /// Stable metric name.
    pub const METRIC: &'static str = "chemistry_blend";
}

impl Calculator for ChemistryBlend {
    fn metric(&self) -> &'static str {
        Self::METRIC
    }

    fn schema(&self) -> InputSchema {
        let weight = |name: &'static str, default: f64, description: &'static str| {
            FieldSpec::defaulted(name, Domain::NonNegative, default, description)
        };
        InputSchema::new(Self::METRIC)
            .field(FieldSpec::required(
                "li_capacity",
                Domain::NonNegative,
                "Installed lithium-ion capacity in kWh",
            ))
            .field(FieldSpec::required(
                "na_capacity",
                Domain::NonNegative,
                "Installed sodium-ion capacity in kWh",
            ))
            .field(weight("alpha", DEFAULT_ALPHA, "Weight of the lithium term"))
            .field(weight("beta", DEFAULT_BETA, "Weight of the sodium term"))
            .field(weight("gamma", DEFAULT_GAMMA, "Weight of the integration term"))
            .field(weight(
                "li_performance",
                DEFAULT_LI_PERFORMANCE,
                "Relative lithium-ion performance",
            ))
            .field(weight(
                "na_performance",
                DEFAULT_NA_PERFORMANCE,
                "Relative sodium-ion performance",
            ))
            .field(weight(
                "integration_bonus",
                DEFAULT_INTEGRATION_BONUS,
                "Bonus for mixing chemistries",
            ))
            .field(weight(
                "li_cost_per_kwh",
                DEFAULT_LI_COST_PER_KWH,
                "Lithium-ion cost in USD per kWh",
            ))
            .field(weight(
                "na_cost_per_kwh",
                DEFAULT_NA_COST_PER_KWH,
                "Sodium-ion cost in USD per kWh",
            ))
            .field(weight(
                "performance_target",
                DEFAULT_PERFORMANCE_TARGET,
                "Score the blend should reach",
            ))
    }

    fn evaluate(&self, params: &ParameterSet) -> Result<ResultRecord, EvaluationError> {
        params.ensure_for(Self::METRIC)?;

        let li_capacity = params.number("li_capacity")?;
        let na_capacity = params.number("na_capacity")?;
        let alpha = params.number("alpha")?;
        let beta = params.number("beta")?;
        let gamma = params.number("gamma")?;
        let li_perf = params.number("li_performance")?;
        let na_perf = params.number("na_performance")?;
        let bonus = params.number("integration_bonus")?;
        let li_cost = params.number("li_cost_per_kwh")?;
        let na_cost = params.number("na_cost_per_kwh")?;
        let target = params.number("performance_target")?;

        let total = li_capacity + na_capacity;
        if total <= 0.0 {
            return Err(DomainError::ZeroTotal {
                name: "total_capacity".to_string(),
            }
            .into());
        }
        let li_ratio = li_capacity / total;
        let na_ratio = na_capacity / total;

        let li_term = alpha * li_perf * li_ratio;
        let na_term = beta * na_perf * na_ratio;
        let integration_term = gamma * bonus * 2.0 * li_ratio.min(na_ratio);
        let score = li_term + na_term + integration_term;

        let cost_per_kwh = (li_capacity * li_cost + na_capacity * na_cost) / total;
        let meets_target = score >= target;

        let mut builder = RecordBuilder::new(Self::METRIC, Unit::Score, Combination::Sum)
            .factor("li_term", li_term)
            .factor("na_term", na_term)
            .factor("integration_term", integration_term)
            .diagnostic("li_ratio", li_ratio)
            .diagnostic("na_ratio", na_ratio)
            .diagnostic("weight_sum", alpha + beta + gamma)
            .diagnostic("cost_per_kwh", cost_per_kwh)
            .diagnostic("meets_target", if meets_target { 1.0 } else { 0.0 });

        if cost_per_kwh > 0.0 {
            let ratio = score / cost_per_kwh * 1000.0;
            let multiplier = if meets_target {
                TARGET_MET_MULTIPLIER
            } else {
                TARGET_MISSED_MULTIPLIER
            };
            builder = builder
                .diagnostic("performance_cost_ratio", ratio)
                .diagnostic("optimization_score", ratio * multiplier);
        }

        Ok(builder.build()?)
    }
}
