//! Degradation-aware charging-rate optimisation.
//!
//! ```text
//! rate = base_rate × soh_factor × temp_factor × dod_factor,  clamped into [min_rate, max_rate]
//! soh_factor  = state_of_health
//! temp_factor = max(0.5, 1 − (T − 25) / 50), capped at 1
//! dod_factor  = 1 − dod_sensitivity × depth_of_discharge_pct
//! ```
//!
//! The record also carries the one-year degradation projection used to
//! plan battery swaps.

use lcis_core::math::{check_band, clamp_range, ensure_positive_factor};
use lcis_core::schema::{Domain, FieldSpec, InputSchema};
use lcis_core::traits::Calculator;
use lcis_core::types::{
    Combination, EvaluationError, ParameterSet, RecordBuilder, ResultRecord, Unit,
};

/// Default base charging rate in C.
pub const DEFAULT_BASE_RATE: f64 = 0.8;
/// Default lower edge of the rate band in C.
pub const DEFAULT_MIN_RATE: f64 = 0.3;
/// Default upper edge of the rate band in C.
pub const DEFAULT_MAX_RATE: f64 = 0.8;
/// Default rate reduction per % depth of discharge.
pub const DEFAULT_DOD_SENSITIVITY: f64 = 0.0005;
/// Default charging efficiency used for the credit-yield multiplier.
pub const DEFAULT_CHARGING_EFFICIENCY: f64 = 0.92;

/// Reference temperature in °C.
const REFERENCE_TEMPERATURE_C: f64 = 25.0;
/// Temperature span over which the rate falls linearly.
const TEMPERATURE_SPAN_C: f64 = 50.0;
/// Floor of the temperature factor.
const MIN_TEMP_FACTOR: f64 = 0.5;

/// Base annual capacity loss.
const DEGRADATION_BASE_RATE: f64 = 0.02;
/// Additional loss per °C above reference.
const DEGRADATION_PER_DEGREE: f64 = 0.001;
/// Additional loss per % depth of discharge.
const DEGRADATION_PER_DOD_PCT: f64 = 0.0005;
/// Additional loss per completed cycle.
const DEGRADATION_PER_CYCLE: f64 = 0.000_001;
/// Floor of the projected state of health.
const MIN_PROJECTED_SOH: f64 = 0.6;

/// Charging-rate calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChargingRate;

impl ChargingRate {
    /// Stable metric name.
    pub const METRIC: &'static str = "charging_rate";
}

/// Temperature factor in [0.5, 1].
///
/// # Examples
/// ```
/// use lcis_models::calculators::charging_rate::temperature_factor;
///
/// assert_eq!(temperature_factor(25.0), 1.0);
/// assert_eq!(temperature_factor(10.0), 1.0);
/// assert!((temperature_factor(45.0) - 0.6).abs() < 1e-12);
/// assert_eq!(temperature_factor(80.0), 0.5);
/// ```
#[inline]
pub fn temperature_factor(temperature_c: f64) -> f64 {
    let raw = 1.0 - (temperature_c - REFERENCE_TEMPERATURE_C) / TEMPERATURE_SPAN_C;
    clamp_range(raw, MIN_TEMP_FACTOR, 1.0)
}

impl Calculator for ChargingRate {
    fn metric(&self) -> &'static str {
        Self::METRIC
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(Self::METRIC)
            .field(FieldSpec::required(
                "state_of_health",
                Domain::PositiveUnit,
                "Battery state of health",
            ))
            .field(FieldSpec::required(
                "temperature_c",
                Domain::Real,
                "Ambient temperature in °C",
            ))
            .field(FieldSpec::required(
                "depth_of_discharge_pct",
                Domain::Closed {
                    min: 0.0,
                    max: 100.0,
                },
                "Depth of discharge in percent",
            ))
            .field(FieldSpec::defaulted(
                "base_rate",
                Domain::Positive,
                DEFAULT_BASE_RATE,
                "Base charging rate in C",
            ))
            .field(FieldSpec::defaulted(
                "min_rate",
                Domain::NonNegative,
                DEFAULT_MIN_RATE,
                "Lower edge of the rate band in C",
            ))
            .field(FieldSpec::defaulted(
                "max_rate",
                Domain::Positive,
                DEFAULT_MAX_RATE,
                "Upper edge of the rate band in C",
            ))
            .field(FieldSpec::defaulted(
                "dod_sensitivity",
                Domain::NonNegative,
                DEFAULT_DOD_SENSITIVITY,
                "Rate reduction per % depth of discharge",
            ))
            .field(FieldSpec::defaulted(
                "cycles_completed",
                Domain::Count { min: 0 },
                0.0,
                "Charge cycles completed so far",
            ))
            .field(FieldSpec::defaulted(
                "charging_efficiency",
                Domain::UnitInterval,
                DEFAULT_CHARGING_EFFICIENCY,
                "Charging efficiency",
            ))
    }

    fn evaluate(&self, params: &ParameterSet) -> Result<ResultRecord, EvaluationError> {
        params.ensure_for(Self::METRIC)?;

        let soh = params.number("state_of_health")?;
        let temperature = params.number("temperature_c")?;
        let dod_pct = params.number("depth_of_discharge_pct")?;
        let base_rate = params.number("base_rate")?;
        let min_rate = params.number("min_rate")?;
        let max_rate = params.number("max_rate")?;
        let sensitivity = params.number("dod_sensitivity")?;
        let cycles = params.number("cycles_completed")?;
        let efficiency = params.number("charging_efficiency")?;

        check_band(min_rate, max_rate)?;

        let soh_factor = ensure_positive_factor("soh_factor", soh)?;
        let temp_factor = ensure_positive_factor("temp_factor", temperature_factor(temperature))?;
        let dod_factor = ensure_positive_factor("dod_factor", 1.0 - sensitivity * dod_pct)?;

        let unclamped = base_rate * soh_factor * temp_factor * dod_factor;

        let degradation_rate = DEGRADATION_BASE_RATE
            + ((temperature - REFERENCE_TEMPERATURE_C) * DEGRADATION_PER_DEGREE).max(0.0)
            + dod_pct * DEGRADATION_PER_DOD_PCT
            + cycles * DEGRADATION_PER_CYCLE;
        let projected_soh = (soh - degradation_rate).max(MIN_PROJECTED_SOH);
        let credit_yield_multiplier = (1.0 + (soh - 0.8) * 0.5) * efficiency;

        let record = RecordBuilder::new(
            Self::METRIC,
            Unit::CRate,
            Combination::ClampedProduct {
                min: min_rate,
                max: max_rate,
            },
        )
        .factor("base_rate", base_rate)
        .factor("soh_factor", soh_factor)
        .factor("temp_factor", temp_factor)
        .factor("dod_factor", dod_factor)
        .diagnostic("unclamped_rate", unclamped)
        .diagnostic("degradation_rate", degradation_rate)
        .diagnostic("projected_soh_1yr", projected_soh)
        .diagnostic("credit_yield_multiplier", credit_yield_multiplier)
        .build()?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lcis_core::types::{DomainError, RawParameters};
    use proptest::prelude::*;

    fn inputs(soh: f64, temperature: f64, dod: f64) -> RawParameters {
        RawParameters::new()
            .with("state_of_health", soh)
            .with("temperature_c", temperature)
            .with("depth_of_discharge_pct", dod)
    }

    #[test]
    fn test_nominal_rate() {
        let record = ChargingRate.evaluate_raw(&inputs(0.9, 25.0, 80.0)).unwrap();
        let expected = 0.8 * 0.9 * 1.0 * (1.0 - 0.0005 * 80.0);
        assert_relative_eq!(record.final_value(), expected, epsilon = 1e-12);
        assert!(!record.clamped());
        assert_eq!(record.unit(), Unit::CRate);
    }

    #[test]
    fn test_low_rate_clamped_up() {
        // 0.8 × 0.4 × 0.5 × 0.96 = 0.1536, below the 0.3 floor
        let record = ChargingRate.evaluate_raw(&inputs(0.4, 60.0, 80.0)).unwrap();
        assert_relative_eq!(record.final_value(), 0.3);
        assert!(record.clamped());
        assert_relative_eq!(
            record.component("unclamped_rate").unwrap(),
            0.8 * 0.4 * 0.5 * 0.96,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_high_base_rate_clamped_down() {
        let raw = inputs(1.0, 20.0, 0.0).with("base_rate", 2.0);
        let record = ChargingRate.evaluate_raw(&raw).unwrap();
        assert_relative_eq!(record.final_value(), 0.8);
        assert!(record.clamped());
    }

    #[test]
    fn test_inverted_band_is_domain_error() {
        let raw = inputs(0.9, 25.0, 80.0)
            .with("min_rate", 0.8)
            .with("max_rate", 0.3);
        assert_eq!(
            ChargingRate.evaluate_raw(&raw).unwrap_err(),
            EvaluationError::Domain(DomainError::InvalidBand { min: 0.8, max: 0.3 })
        );
    }

    #[test]
    fn test_non_positive_dod_factor_is_domain_error() {
        let raw = inputs(0.9, 25.0, 100.0).with("dod_sensitivity", 0.01);
        match ChargingRate.evaluate_raw(&raw) {
            Err(EvaluationError::Domain(DomainError::NonPositiveFactor { name, .. })) => {
                assert_eq!(name, "dod_factor");
            }
            other => panic!("Expected NonPositiveFactor, got {:?}", other),
        }
    }

    #[test]
    fn test_degradation_diagnostics() {
        let raw = inputs(0.9, 35.0, 80.0).with("cycles_completed", 1000.0);
        let record = ChargingRate.evaluate_raw(&raw).unwrap();

        let degradation = 0.02 + 10.0 * 0.001 + 80.0 * 0.0005 + 1000.0 * 0.000_001;
        assert_relative_eq!(
            record.component("degradation_rate").unwrap(),
            degradation,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            record.component("projected_soh_1yr").unwrap(),
            0.9 - degradation,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            record.component("credit_yield_multiplier").unwrap(),
            1.05 * 0.92,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_projected_soh_floor() {
        let record = ChargingRate.evaluate_raw(&inputs(0.6, 45.0, 100.0)).unwrap();
        assert_eq!(record.component("projected_soh_1yr"), Some(0.6));
    }

    #[test]
    fn test_fractional_cycles_rejected() {
        let raw = inputs(0.9, 25.0, 80.0).with("cycles_completed", 10.5);
        assert!(matches!(
            ChargingRate.evaluate_raw(&raw),
            Err(EvaluationError::Validation(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn test_rate_within_band(
            soh in 0.05..=1.0_f64,
            temperature in -20.0..70.0_f64,
            dod in 0.0..=100.0_f64,
            base in 0.1..3.0_f64,
        ) {
            let raw = inputs(soh, temperature, dod).with("base_rate", base);
            let record = ChargingRate.evaluate_raw(&raw).unwrap();
            let rate = record.final_value();
            prop_assert!((DEFAULT_MIN_RATE..=DEFAULT_MAX_RATE).contains(&rate));

            let unclamped = record.component("unclamped_rate").unwrap();
            let outside = !(DEFAULT_MIN_RATE..=DEFAULT_MAX_RATE).contains(&unclamped);
            prop_assert_eq!(record.clamped(), outside);
        }

        #[test]
        fn test_factors_in_unit_interval(
            soh in 0.05..=1.0_f64,
            temperature in -40.0..80.0_f64,
            dod in 0.0..=100.0_f64,
        ) {
            let record = ChargingRate.evaluate_raw(&inputs(soh, temperature, dod)).unwrap();
            for name in ["soh_factor", "temp_factor", "dod_factor"] {
                let v = record.component(name).unwrap();
                prop_assert!(v > 0.0 && v <= 1.0, "{} = {}", name, v);
            }
        }
    }
}
