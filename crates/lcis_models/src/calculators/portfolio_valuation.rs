//! Blended asset portfolio valuation.
//!
//! ```text
//! value = Σ_i asset_value_i × weight_i × risk_adjustment_i × liquidity_factor_i
//! ```
//!
//! Per-asset contributions are kept as a breakdown in input order. Weights
//! need not sum to one; the sum is reported and a warning is attached when
//! it does not.

use lcis_core::schema::{Domain, FieldSpec, InputSchema};
use lcis_core::traits::Calculator;
use lcis_core::types::{
    Combination, DomainError, EvaluationError, ParameterSet, RecordBuilder, ResultRecord, Unit,
};

/// Tolerance on `|weight_sum − 1|` before a warning is recorded.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Volatility assumed for the Sharpe ratio.
const ASSUMED_VOLATILITY: f64 = 0.15;
/// Diversification bonus per log-asset.
const DIVERSIFICATION_COEFFICIENT: f64 = 0.1;

/// Portfolio valuation calculator.
///
/// # Examples
/// ```
/// use lcis_core::traits::Calculator;
/// use lcis_core::types::RawParameters;
/// use lcis_models::calculators::PortfolioValuation;
///
/// let raw = RawParameters::new()
///     .with("asset_values", vec![100_000.0, 200_000.0])
///     .with("weights", vec![0.5, 0.5])
///     .with("risk_adjustments", vec![0.9, 0.8])
///     .with("liquidity_factors", vec![1.0, 0.5]);
///
/// let record = PortfolioValuation.evaluate_raw(&raw).unwrap();
/// assert!((record.final_value() - 85_000.0).abs() < 1e-6);
/// assert_eq!(record.breakdown()[1].label, "asset[1]");
/// assert!(record.warnings().is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortfolioValuation;

impl PortfolioValuation {
    /// Stable metric name.
    pub const METRIC: &'static str = "portfolio_valuation";
}

fn ensure_len(field: &str, expected: usize, found: usize) -> Result<(), DomainError> {
    if expected == found {
        Ok(())
    } else {
        Err(DomainError::LengthMismatch {
            field: field.to_string(),
            expected,
            found,
        })
    }
}

impl Calculator for PortfolioValuation {
    fn metric(&self) -> &'static str {
        Self::METRIC
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(Self::METRIC)
            .field(FieldSpec::required(
                "asset_values",
                Domain::series_of(Domain::NonNegative),
                "Asset values in USD",
            ))
            .field(FieldSpec::required(
                "weights",
                Domain::series_of(Domain::NonNegative),
                "Portfolio weights",
            ))
            .field(FieldSpec::required(
                "risk_adjustments",
                Domain::series_of(Domain::UnitInterval),
                "Risk haircut multipliers",
            ))
            .field(FieldSpec::required(
                "liquidity_factors",
                Domain::series_of(Domain::UnitInterval),
                "Liquidity multipliers",
            ))
            .field(FieldSpec::optional(
                "asset_ids",
                Domain::Labels,
                "Asset labels for the breakdown",
            ))
            .field(FieldSpec::optional(
                "expected_yields",
                Domain::series_of(Domain::Real),
                "Expected annual yields",
            ))
    }

    fn evaluate(&self, params: &ParameterSet) -> Result<ResultRecord, EvaluationError> {
        params.ensure_for(Self::METRIC)?;

        let values = params.series("asset_values")?;
        let weights = params.series("weights")?;
        let risks = params.series("risk_adjustments")?;
        let liquidity = params.series("liquidity_factors")?;
        let ids = params.optional_labels("asset_ids")?;
        let yields = params.optional_series("expected_yields")?;

        let n = values.len();
        ensure_len("weights", n, weights.len())?;
        ensure_len("risk_adjustments", n, risks.len())?;
        ensure_len("liquidity_factors", n, liquidity.len())?;
        if let Some(ids) = ids {
            ensure_len("asset_ids", n, ids.len())?;
        }
        if let Some(yields) = yields {
            ensure_len("expected_yields", n, yields.len())?;
        }

        let mut builder = RecordBuilder::new(Self::METRIC, Unit::Usd, Combination::BreakdownSum);

        for i in 0..n {
            let label = match ids {
                Some(ids) => ids[i].clone(),
                None => format!("asset[{}]", i),
            };
            let contribution = values[i] * weights[i] * risks[i] * liquidity[i];
            builder = builder.breakdown_entry(label, contribution);
        }

        let weight_sum: f64 = weights.iter().sum();
        builder = builder
            .diagnostic("weight_sum", weight_sum)
            .diagnostic("asset_count", n as f64);

        if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            tracing::warn!(weight_sum, "portfolio weights do not sum to 1");
            builder = builder.warning(format!("weights sum to {}, not 1", weight_sum));
        }

        if let Some(yields) = yields {
            let portfolio_yield = if weight_sum > 0.0 {
                yields
                    .iter()
                    .zip(weights)
                    .map(|(y, w)| y * w)
                    .sum::<f64>()
                    / weight_sum
            } else {
                0.0
            };
            let correlation_adjustment =
                1.0 + DIVERSIFICATION_COEFFICIENT * (n.max(1) as f64).ln();
            let sharpe = if portfolio_yield > 0.0 {
                portfolio_yield / ASSUMED_VOLATILITY
            } else {
                0.0
            };
            builder = builder
                .diagnostic("portfolio_yield", portfolio_yield)
                .diagnostic("correlation_adjustment", correlation_adjustment)
                .diagnostic("blended_yield", portfolio_yield * correlation_adjustment)
                .diagnostic("sharpe_ratio", sharpe);
        }

        Ok(builder.build()?)
    }
}
