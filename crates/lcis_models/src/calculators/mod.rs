//! Formula calculators.
//!
//! Six mutually independent calculators, each a stateless unit struct
//! implementing [`Calculator`]:
//! - [`CarbonCredit`]: carbon credits from delivered energy (`credits`)
//! - [`ChargingRate`]: degradation-aware charging rate (`C`)
//! - [`StationIntegrity`]: swap-station integrity score (`score`)
//! - [`PortfolioValuation`]: blended asset portfolio value (`USD`)
//! - [`DataStewardship`]: cross-border data value (`USD`)
//! - [`ChemistryBlend`]: Li-ion / Na-ion blend score (`score`)
//!
//! # Architecture
//!
//! [`CalculatorKind`] wraps all calculators for static dispatch and is
//! resolvable from the stable metric name used at the input boundary.
//!
//! # Examples
//!
//! ```
//! use lcis_core::traits::Calculator;
//! use lcis_core::types::RawParameters;
//! use lcis_models::calculators::CalculatorKind;
//!
//! let kind = CalculatorKind::from_name("station_integrity").unwrap();
//! let raw = RawParameters::new()
//!     .with("error_rate", 0.0)
//!     .with("verification_confidence", 1.0)
//!     .with("throughput_efficiency", 0.5);
//!
//! let record = kind.evaluate_raw(&raw).unwrap();
//! assert_eq!(record.metric(), "station_integrity");
//! assert_eq!(record.final_value(), 0.5);
//! ```

pub mod carbon_credit;
pub mod charging_rate;
pub mod chemistry_blend;
pub mod data_stewardship;
pub mod integrity;
pub mod portfolio_valuation;

pub use carbon_credit::CarbonCredit;
pub use charging_rate::ChargingRate;
pub use chemistry_blend::ChemistryBlend;
pub use data_stewardship::DataStewardship;
pub use integrity::StationIntegrity;
pub use portfolio_valuation::PortfolioValuation;

use std::fmt;

use lcis_core::schema::InputSchema;
use lcis_core::traits::Calculator;
use lcis_core::types::{EvaluationError, ParameterSet, ResultRecord};

/// Unified calculator enum for static dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CalculatorKind {
    /// Carbon-credit generation
    CarbonCredit,
    /// Charging-rate optimisation
    ChargingRate,
    /// Station integrity score
    StationIntegrity,
    /// Portfolio valuation
    PortfolioValuation,
    /// Data-stewardship value
    DataStewardship,
    /// Chemistry-blend score
    ChemistryBlend,
}

impl CalculatorKind {
    /// All calculators in a fixed order.
    pub fn all() -> [CalculatorKind; 6] {
        [
            CalculatorKind::CarbonCredit,
            CalculatorKind::ChargingRate,
            CalculatorKind::StationIntegrity,
            CalculatorKind::PortfolioValuation,
            CalculatorKind::DataStewardship,
            CalculatorKind::ChemistryBlend,
        ]
    }

    /// Stable metric name.
    pub fn name(&self) -> &'static str {
        match self {
            CalculatorKind::CarbonCredit => CarbonCredit::METRIC,
            CalculatorKind::ChargingRate => ChargingRate::METRIC,
            CalculatorKind::StationIntegrity => StationIntegrity::METRIC,
            CalculatorKind::PortfolioValuation => PortfolioValuation::METRIC,
            CalculatorKind::DataStewardship => DataStewardship::METRIC,
            CalculatorKind::ChemistryBlend => ChemistryBlend::METRIC,
        }
    }

    /// Resolves a calculator from its stable name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Calculator for CalculatorKind {
    fn metric(&self) -> &'static str {
        self.name()
    }

    fn schema(&self) -> InputSchema {
        match self {
            CalculatorKind::CarbonCredit => CarbonCredit.schema(),
            CalculatorKind::ChargingRate => ChargingRate.schema(),
            CalculatorKind::StationIntegrity => StationIntegrity.schema(),
            CalculatorKind::PortfolioValuation => PortfolioValuation.schema(),
            CalculatorKind::DataStewardship => DataStewardship.schema(),
            CalculatorKind::ChemistryBlend => ChemistryBlend.schema(),
        }
    }

    #[inline]
    fn evaluate(&self, params: &ParameterSet) -> Result<ResultRecord, EvaluationError> {
        match self {
            CalculatorKind::CarbonCredit => CarbonCredit.evaluate(params),
            CalculatorKind::ChargingRate => ChargingRate.evaluate(params),
            CalculatorKind::StationIntegrity => StationIntegrity.evaluate(params),
            CalculatorKind::PortfolioValuation => PortfolioValuation.evaluate(params),
            CalculatorKind::DataStewardship => DataStewardship.evaluate(params),
            CalculatorKind::ChemistryBlend => ChemistryBlend.evaluate(params),
        }
    }
}
