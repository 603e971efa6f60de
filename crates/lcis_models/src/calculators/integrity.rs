//! Swap-station integrity and quality-gate score.
//!
//! ```text
//! score = (1 − error_rate) × verification_confidence × throughput_efficiency
//! ```
//!
//! Each factor lies in [0, 1], so the score does too and is not re-clamped.
//! When `verification_samples` is supplied the record also carries the
//! 95% confidence interval of the quality gate.

use lcis_core::math::clamp_unit;
use lcis_core::schema::{Domain, FieldSpec, InputSchema};
use lcis_core::traits::Calculator;
use lcis_core::types::{
    Combination, EvaluationError, ParameterSet, RecordBuilder, ResultRecord, Unit,
};

/// z-score of a two-sided 95% interval.
const Z_95: f64 = 1.96;
/// Samples above which the normal approximation is used.
const MIN_SAMPLES_FOR_NORMAL: f64 = 30.0;
/// Margin of error assumed for small samples.
const SMALL_SAMPLE_MARGIN: f64 = 0.1;

/// Station integrity calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationIntegrity;

impl StationIntegrity {
    /// Stable metric name.
    pub const METRIC: &'static str = "station_integrity";
}

/// Margin of error of a pass rate `p` observed over `samples` checks.
///
/// # Examples
/// ```
/// use lcis_models::calculators::integrity::margin_of_error;
///
/// assert_eq!(margin_of_error(0.95, 10.0), 0.1);
/// let m = margin_of_error(0.95, 100.0);
/// assert!((m - 1.96 * (0.95 * 0.05 / 100.0_f64).sqrt()).abs() < 1e-12);
/// ```
pub fn margin_of_error(p: f64, samples: f64) -> f64 {
    if samples > MIN_SAMPLES_FOR_NORMAL {
        Z_95 * (p * (1.0 - p) / samples).sqrt()
    } else {
        SMALL_SAMPLE_MARGIN
    }
}

impl Calculator for StationIntegrity {
    fn metric(&self) -> &'static str {
        Self::METRIC
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(Self::METRIC)
            .field(FieldSpec::required(
                "error_rate",
                Domain::UnitInterval,
                "Share of swaps with a detected error",
            ))
            .field(FieldSpec::required(
                "verification_confidence",
                Domain::UnitInterval,
                "Confidence of the verification process",
            ))
            .field(FieldSpec::required(
                "throughput_efficiency",
                Domain::UnitInterval,
                "Achieved share of theoretical swap throughput",
            ))
            .field(FieldSpec::optional(
                "verification_samples",
                Domain::Count { min: 1 },
                "Number of sampled verifications",
            ))
    }

    fn evaluate(&self, params: &ParameterSet) -> Result<ResultRecord, EvaluationError> {
        params.ensure_for(Self::METRIC)?;

        let error_rate = clamp_unit(params.number("error_rate")?);
        let verification = clamp_unit(params.number("verification_confidence")?);
        let throughput = clamp_unit(params.number("throughput_efficiency")?);
        let pass_rate = clamp_unit(1.0 - error_rate);

        let mut builder = RecordBuilder::new(Self::METRIC, Unit::Score, Combination::Product)
            .factor("pass_rate", pass_rate)
            .factor("verification_confidence", verification)
            .factor("throughput_efficiency", throughput)
            .confidence(verification);

        if let Some(samples) = params.optional_number("verification_samples")? {
            let margin = margin_of_error(pass_rate, samples);
            builder = builder
                .diagnostic("quality_gate_score", pass_rate)
                .diagnostic("margin_of_error", margin)
                .diagnostic("confidence_lower", clamp_unit(pass_rate - margin))
                .diagnostic("confidence_upper", clamp_unit(pass_rate + margin));
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lcis_core::types::RawParameters;
    use proptest::prelude::*;

    fn inputs(error: f64, verification: f64, throughput: f64) -> RawParameters {
        RawParameters::new()
            .with("error_rate", error)
            .with("verification_confidence", verification)
            .with("throughput_efficiency", throughput)
    }

    #[test]
    fn test_score_formula() {
        let record = StationIntegrity
            .evaluate_raw(&inputs(0.02, 0.99, 0.85))
            .unwrap();
        assert_relative_eq!(record.final_value(), 0.98 * 0.99 * 0.85, epsilon = 1e-12);
        assert_eq!(record.confidence(), Some(0.99));
        assert_eq!(record.diagnostics().count(), 0);
    }

    #[test]
    fn test_large_sample_interval() {
        let raw = inputs(0.05, 1.0, 1.0).with("verification_samples", 100.0);
        let record = StationIntegrity.evaluate_raw(&raw).unwrap();

        let margin = 1.96 * (0.95_f64 * 0.05 / 100.0).sqrt();
        assert_relative_eq!(
            record.component("margin_of_error").unwrap(),
            margin,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            record.component("confidence_lower").unwrap(),
            0.95 - margin,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            record.component("confidence_upper").unwrap(),
            0.95 + margin,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_small_sample_interval_clamped() {
        let raw = inputs(0.0, 1.0, 1.0).with("verification_samples", 25.0);
        let record = StationIntegrity.evaluate_raw(&raw).unwrap();
        assert_eq!(record.component("margin_of_error"), Some(0.1));
        assert_eq!(record.component("confidence_upper"), Some(1.0));
        assert_eq!(record.component("confidence_lower"), Some(0.9));
    }

    #[test]
    fn test_zero_samples_rejected() {
        let raw = inputs(0.0, 1.0, 1.0).with("verification_samples", 0.0);
        assert!(StationIntegrity.evaluate_raw(&raw).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn test_score_in_unit_interval(
            error in 0.0..=1.0_f64,
            verification in 0.0..=1.0_f64,
            throughput in 0.0..=1.0_f64,
        ) {
            let record = StationIntegrity
                .evaluate_raw(&inputs(error, verification, throughput))
                .unwrap();
            prop_assert!((0.0..=1.0).contains(&record.final_value()));
        }
    }
}
