//! Carbon-credit generation from delivered charging energy.
//!
//! ```text
//! credits = energy_delivered × efficiency × (1 − grid_carbon_intensity × clean_ratio)
//!           × base_credit_rate × quality_factor
//! ```
//!
//! The quality factor is the telemetry attestation confidence. When it is
//! not supplied it defaults to `accuracy_threshold × verification_confidence`
//! = 0.95 × 0.99, and the record shows it as defaulted.

use lcis_core::math::{clamp_unit, ensure_finite};
use lcis_core::schema::{Domain, FieldSpec, InputSchema};
use lcis_core::traits::Calculator;
use lcis_core::types::{Combination, EvaluationError, ParameterSet, RecordBuilder, ResultRecord, Unit};

/// Telemetry accuracy required for credit issuance.
pub const ACCURACY_THRESHOLD: f64 = 0.95;

/// Verification confidence level.
pub const VERIFICATION_CONFIDENCE: f64 = 0.99;

/// Default quality factor (`ACCURACY_THRESHOLD × VERIFICATION_CONFIDENCE`).
pub const DEFAULT_QUALITY_FACTOR: f64 = ACCURACY_THRESHOLD * VERIFICATION_CONFIDENCE;

/// Default carbon price in USD per tonne CO2e.
pub const DEFAULT_CARBON_PRICE_PER_TON: f64 = 25.0;

/// Carbon-credit calculator.
///
/// # Examples
/// ```
/// use lcis_core::traits::Calculator;
/// use lcis_core::types::RawParameters;
/// use lcis_models::calculators::CarbonCredit;
///
/// let raw = RawParameters::new()
///     .with("energy_delivered", 10.0)
///     .with("efficiency", 0.95)
///     .with("grid_carbon_intensity", 0.4)
///     .with("clean_ratio", 0.3)
///     .with("base_credit_rate", 0.0865)
///     .with("quality_factor", 0.94);
///
/// let record = CarbonCredit.evaluate_raw(&raw).unwrap();
/// let expected = 10.0 * 0.95 * (1.0 - 0.4 * 0.3) * 0.0865 * 0.94;
/// assert!((record.final_value() - expected).abs() < 1e-9);
/// assert_eq!(record.confidence(), Some(0.94));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarbonCredit;

impl CarbonCredit {
    /// Stable metric name.
    pub const METRIC: &'static str = "carbon_credit";
}

impl Calculator for CarbonCredit {
    fn metric(&self) -> &'static str {
        Self::METRIC
    }

    fn schema(&self) -> InputSchema {
        InputSchema::new(Self::METRIC)
            .field(FieldSpec::required(
                "energy_delivered",
                Domain::NonNegative,
                "Energy delivered in kWh",
            ))
            .field(FieldSpec::required(
                "efficiency",
                Domain::UnitInterval,
                "Charging efficiency",
            ))
            .field(FieldSpec::required(
                "grid_carbon_intensity",
                Domain::NonNegative,
                "Grid carbon intensity in kg CO2e per kWh",
            ))
            .field(FieldSpec::required(
                "clean_ratio",
                Domain::UnitInterval,
                "Share of clean energy in the charging mix",
            ))
            .field(FieldSpec::required(
                "base_credit_rate",
                Domain::NonNegative,
                "Credits issued per effective kWh",
            ))
            .field(FieldSpec::defaulted(
                "quality_factor",
                Domain::UnitInterval,
                DEFAULT_QUALITY_FACTOR,
                "Telemetry attestation confidence",
            ))
            .field(FieldSpec::defaulted(
                "carbon_price_per_ton",
                Domain::NonNegative,
                DEFAULT_CARBON_PRICE_PER_TON,
                "Carbon price in USD per tonne CO2e",
            ))
    }

    fn evaluate(&self, params: &ParameterSet) -> Result<ResultRecord, EvaluationError> {
        params.ensure_for(Self::METRIC)?;

        let energy = params.number("energy_delivered")?;
        let efficiency = clamp_unit(params.number("efficiency")?);
        let intensity = params.number("grid_carbon_intensity")?;
        let clean_ratio = clamp_unit(params.number("clean_ratio")?);
        let base_rate = params.number("base_credit_rate")?;
        let quality = clamp_unit(params.number("quality_factor")?);
        let carbon_price = params.number("carbon_price_per_ton")?;

        let clean_energy_factor = clamp_unit(1.0 - intensity * clean_ratio);

        let avoided_kg = ensure_finite("avoided_emissions_kg", energy * intensity * clean_ratio)?;
        let carbon_value = avoided_kg / 1000.0 * carbon_price;

        let mut builder = RecordBuilder::new(Self::METRIC, Unit::Credits, Combination::Product)
            .factor("energy_delivered", energy)
            .factor("efficiency", efficiency)
            .factor("clean_energy_factor", clean_energy_factor)
            .factor("base_credit_rate", base_rate)
            .factor("quality_factor", quality)
            .confidence(quality)
            .diagnostic("avoided_emissions_kg", avoided_kg)
            .diagnostic("carbon_value_usd", carbon_value);

        if energy > 0.0 {
            let credits = energy * efficiency * clean_energy_factor * base_rate * quality;
            builder = builder.diagnostic("credit_rate", credits / energy);
        }

        Ok(builder.build()?)
    }
}
