//! Cross-border data-stewardship value.
//!
//! ```text
//! value = volume_factor × jurisdiction_complexity × compliance_multiplier / time_penalty
//!
//! volume_factor           = data_volume_gb × base_value_per_gb
//! jurisdiction_complexity = (1 + (j − 1) × 0.15) × clamp(1 − (j − 1) × 0.05, [0, 1])
//! compliance_multiplier   = 0.5 + 1.5 × compliance_score
//! time_penalty            = processing_time_hours / (data_volume_gb × target_hours_per_gb)
//! ```
//!
//! A non-positive time penalty or target time is a `DomainError`.

use lcis_core::math::{clamp_unit, ensure_positive_divisor};
use lcis_core::schema::{Domain, FieldSpec, InputSchema};
use lcis_core::traits::Calculator;
use lcis_core::types::{
    Combination, EvaluationError, ParameterSet, RecordBuilder, ResultRecord, Unit,
};

/// Default value of one processed GB in USD.
pub const DEFAULT_BASE_VALUE_PER_GB: f64 = 2.5;
/// Default processing-time target in hours per GB.
pub const DEFAULT_TARGET_HOURS_PER_GB: f64 = 0.1;
/// Default security factor of the governance score.
pub const DEFAULT_SECURITY_FACTOR: f64 = 0.95;

const JURISDICTION_PREMIUM: f64 = 0.15;
const JURISDICTION_PENALTY: f64 = 0.05;
const MAX_TIME_EFFICIENCY: f64 = 1.5;

/// Data-stewardship calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataStewardship;

impl DataStewardship {
    /// Stable metric name.
    pub const METRIC: &'static str = "data_stewardship";
}

/// Complexity multiplier for `jurisdictions` jurisdictions.
///
/// # Examples
/// ```
/// use lcis_models::calculators::data_stewardship::jurisdiction_complexity;
///
/// assert_eq!(jurisdiction_complexity(1.0), 1.0);
/// assert!((jurisdiction_complexity(5.0) - 1.6 * 0.8).abs() < 1e-12);
/// assert_eq!(jurisdiction_complexity(30.0), 0.0);
/// ```
pub fn jurisdiction_complexity(jurisdictions: f64) -> f64 {
    let extra = jurisdictions - 1.0;
    (1.0 + extra * JURISDICTION_PREMIUM) * clamp_unit(1.0 - extra * JURISDICTION_PENALTY)
}

impl Calculator for DataStewardship {
    fn metric(&self) -> &'static str {
        Self::METRIC
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(Self::METRIC)
            .field(FieldSpec::required(
                "data_volume_gb",
                Domain::NonNegative,
                "Volume of data processed in GB",
            ))
            .field(FieldSpec::required(
                "jurisdictions",
                Domain::Count { min: 1 },
                "Number of jurisdictions the data crosses",
            ))
            .field(FieldSpec::required(
                "compliance_score",
                Domain::UnitInterval,
                "Regulatory compliance score",
            ))
            .field(FieldSpec::required(
                "processing_time_hours",
                Domain::NonNegative,
                "Actual processing time in hours",
            ))
            .field(FieldSpec::defaulted(
                "base_value_per_gb",
                Domain::NonNegative,
                DEFAULT_BASE_VALUE_PER_GB,
                "Value of one processed GB in USD",
            ))
            .field(FieldSpec::defaulted(
                "target_hours_per_gb",
                Domain::NonNegative,
                DEFAULT_TARGET_HOURS_PER_GB,
                "Processing-time target in hours per GB",
            ))
            .field(FieldSpec::defaulted(
                "security_factor",
                Domain::UnitInterval,
                DEFAULT_SECURITY_FACTOR,
                "Security factor of the governance score",
            ))
    }

    fn evaluate(&self, params: &ParameterSet) -> Result<ResultRecord, EvaluationError> {
        params.ensure_for(Self::METRIC)?;

        let volume = params.number("data_volume_gb")?;
        let jurisdictions = params.number("jurisdictions")?;
        let compliance = clamp_unit(params.number("compliance_score")?);
        let processing_hours = params.number("processing_time_hours")?;
        let base_value = params.number("base_value_per_gb")?;
        let target_per_gb = params.number("target_hours_per_gb")?;
        let security = clamp_unit(params.number("security_factor")?);

        let target_hours = ensure_positive_divisor("target_hours", volume * target_per_gb)?;
        let time_penalty =
            ensure_positive_divisor("time_penalty", processing_hours / target_hours)?;

        let time_efficiency = 1.0 / time_penalty;
        let governance = compliance * time_efficiency.min(MAX_TIME_EFFICIENCY) * security;

        let record = RecordBuilder::new(
            Self::METRIC,
            Unit::Usd,
            Combination::Quotient {
                denominator: "time_penalty".to_string(),
            },
        )
        .factor("volume_factor", volume * base_value)
        .factor("jurisdiction_complexity", jurisdiction_complexity(jurisdictions))
        .factor("compliance_multiplier", 0.5 + 1.5 * compliance)
        .factor("time_penalty", time_penalty)
        .diagnostic("time_efficiency", time_efficiency)
        .diagnostic("governance_score", governance)
        .build()?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lcis_core::types::{DomainError, RawParameters};

    fn inputs(volume: f64, jurisdictions: f64, compliance: f64, hours: f64) -> RawParameters {
        RawParameters::new()
            .with("data_volume_gb", volume)
            .with("jurisdictions", jurisdictions)
            .with("compliance_score", compliance)
            .with("processing_time_hours", hours)
    }

    #[test]
    fn test_value_formula() {
        let record = DataStewardship
            .evaluate_raw(&inputs(100.0, 2.0, 0.9, 8.0))
            .unwrap();

        let volume_factor = 100.0 * 2.5;
        let complexity = 1.15 * 0.95;
        let compliance = 0.5 + 1.5 * 0.9;
        let penalty = 8.0 / 10.0;
        assert_relative_eq!(
            record.final_value(),
            volume_factor * complexity * compliance / penalty,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            record.component("governance_score").unwrap(),
            0.9 * 1.25 * 0.95,
            epsilon = 1e-12
        );
        assert!(record.verify(1e-9));
    }

    #[test]
    fn test_governance_efficiency_capped() {
        let record = DataStewardship
            .evaluate_raw(&inputs(100.0, 1.0, 1.0, 1.0))
            .unwrap();
        assert_relative_eq!(
            record.component("governance_score").unwrap(),
            1.5 * 0.95,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_processing_time_is_domain_error() {
        match DataStewardship.evaluate_raw(&inputs(100.0, 2.0, 0.9, 0.0)) {
            Err(EvaluationError::Domain(DomainError::NonPositiveDivisor { name, value })) => {
                assert_eq!(name, "time_penalty");
                assert_eq!(value, 0.0);
            }
            other => panic!("Expected NonPositiveDivisor, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_target_is_domain_error() {
        let raw = inputs(100.0, 2.0, 0.9, 8.0).with("target_hours_per_gb", 0.0);
        match DataStewardship.evaluate_raw(&raw) {
            Err(EvaluationError::Domain(DomainError::NonPositiveDivisor { name, .. })) => {
                assert_eq!(name, "target_hours");
            }
            other => panic!("Expected NonPositiveDivisor, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_volume_is_domain_error() {
        assert!(matches!(
            DataStewardship.evaluate_raw(&inputs(0.0, 2.0, 0.9, 8.0)),
            Err(EvaluationError::Domain(_))
        ));
    }

    #[test]
    fn test_fractional_jurisdictions_rejected() {
        assert!(matches!(
            DataStewardship.evaluate_raw(&inputs(10.0, 2.5, 0.9, 1.0)),
            Err(EvaluationError::Validation(_))
        ));
    }
}
