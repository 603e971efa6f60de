//! Demo scenarios for every calculator.
//!
//! This module provides:
//! - One sample [`Scenario`] per calculator, built from fixed parameter
//!   sweeps
//! - A seeded random asset portfolio for the valuation calculator
//! - [`run_all`]: runs a set of demo scenarios in parallel
//!
//! Every generator is deterministic: the portfolio sampler takes an
//! explicit seed.

use lcis_core::types::RawParameters;
use lcis_models::calculators::CalculatorKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::RunError;
use crate::parallel::parallel_map;
use crate::scenario::{Scenario, ScenarioRun, ScenarioRunner};

/// Seed used by the demo portfolio when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Swaps a station can perform per day at 90 seconds per swap.
const MAX_SWAPS_PER_DAY: f64 = 24.0 * 3600.0 / 90.0;

/// Share of swaps sampled for verification.
const VERIFICATION_SAMPLE_RATE: f64 = 0.1;

/// Processing hours per GB assumed by the stewardship sweep.
const PROCESSING_HOURS_PER_GB: f64 = 0.08;

/// Installed capacity of the blend sweep in kWh.
const BLEND_TOTAL_CAPACITY: f64 = 100.0;

/// A demo scenario and the calculator it is meant for.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoScenario {
    /// Calculator to run
    pub kind: CalculatorKind,
    /// Inputs to run it over
    pub scenario: Scenario,
}

/// Carbon credits for 10, 25, 50 and 100 kWh delivered.
pub fn carbon_energy_sweep() -> Scenario {
    let shared = RawParameters::new()
        .with("efficiency", 0.92)
        .with("grid_carbon_intensity", 0.4)
        .with("clean_ratio", 0.7)
        .with("base_credit_rate", 0.1);

    [10.0, 25.0, 50.0, 100.0]
        .iter()
        .enumerate()
        .fold(
            Scenario::new("carbon_energy_sweep").with_shared(shared),
            |scenario, (t, &energy)| {
                scenario.time_step(
                    t as u64,
                    RawParameters::new().with("energy_delivered", energy),
                )
            },
        )
}

/// Charging rates over state of health × temperature × cycle count at
/// 80% depth of discharge.
pub fn charging_grid() -> Scenario {
    let mut scenario = Scenario::new("charging_grid")
        .with_shared(RawParameters::new().with("depth_of_discharge_pct", 80.0));

    let mut t = 0;
    for soh in [0.6, 0.7, 0.8, 0.9, 1.0] {
        for temperature in [15.0, 25.0, 35.0, 45.0] {
            for cycles in [0.0, 500.0, 1000.0, 2000.0] {
                scenario = scenario.time_step(
                    t,
                    RawParameters::new()
                        .with("state_of_health", soh)
                        .with("temperature_c", temperature)
                        .with("cycles_completed", cycles),
                );
                t += 1;
            }
        }
    }
    scenario
}

/// Integrity inputs for a station doing `swaps_per_day` swaps and
/// verifying `samples` of them.
///
/// # Examples
///
/// ```
/// use lcis_portfolio::demo::integrity_inputs;
///
/// let raw = integrity_inputs(200.0, 0.05, 10.0);
/// assert_eq!(raw.get("verification_confidence").and_then(|v| v.as_number()), Some(0.5));
/// ```
pub fn integrity_inputs(swaps_per_day: f64, error_rate: f64, samples: f64) -> RawParameters {
    let verification = (samples / (swaps_per_day * VERIFICATION_SAMPLE_RATE)).min(1.0);
    let throughput = (swaps_per_day / MAX_SWAPS_PER_DAY).min(1.0);

    RawParameters::new()
        .with("error_rate", error_rate)
        .with("verification_confidence", verification)
        .with("throughput_efficiency", throughput)
        .with("verification_samples", samples)
}

/// Station integrity over swaps per day × error rate × verification samples.
pub fn integrity_grid() -> Scenario {
    let mut scenario = Scenario::new("integrity_grid");
    let mut t = 0;
    for swaps in [50.0, 100.0, 200.0, 400.0] {
        for error_rate in [0.01, 0.02, 0.05, 0.1] {
            for samples in [10.0, 25.0, 50.0, 100.0] {
                scenario = scenario.time_step(t, integrity_inputs(swaps, error_rate, samples));
                t += 1;
            }
        }
    }
    scenario
}

/// A random portfolio of `size` assets.
///
/// Values are drawn from U(50k, 500k), raw weights from U(0.1, 0.3) and then
/// normalised, risk scores from U(0.2, 0.8) giving a risk adjustment of
/// `1 − 0.3 × risk`, liquidity from U(0.6, 0.95) and yields from
/// U(0.03, 0.12). Assets are labelled `ASSET_001`, `ASSET_002`, ….
///
/// # Examples
///
/// ```
/// use lcis_portfolio::demo::sample_portfolio;
///
/// let a = sample_portfolio(5, 42);
/// let b = sample_portfolio(5, 42);
/// assert_eq!(a, b);
///
/// let weights = a.get("weights").and_then(|v| v.as_series()).unwrap();
/// assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
pub fn sample_portfolio(size: usize, seed: u64) -> RawParameters {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut ids = Vec::with_capacity(size);
    let mut values: Vec<f64> = Vec::with_capacity(size);
    let mut weights: Vec<f64> = Vec::with_capacity(size);
    let mut risk_adjustments: Vec<f64> = Vec::with_capacity(size);
    let mut liquidity: Vec<f64> = Vec::with_capacity(size);
    let mut yields: Vec<f64> = Vec::with_capacity(size);

    for i in 0..size {
        ids.push(format!("ASSET_{:03}", i + 1));
        values.push(rng.gen_range(50_000.0..500_000.0));
        weights.push(rng.gen_range(0.1..0.3));
        let risk_score: f64 = rng.gen_range(0.2..0.8);
        risk_adjustments.push(1.0 - risk_score * 0.3);
        liquidity.push(rng.gen_range(0.6..0.95));
        yields.push(rng.gen_range(0.03..0.12));
    }

    let weight_total: f64 = weights.iter().sum();
    if weight_total > 0.0 {
        for w in &mut weights {
            *w /= weight_total;
        }
    }

    RawParameters::new()
        .with("asset_ids", ids)
        .with("asset_values", values)
        .with("weights", weights)
        .with("risk_adjustments", risk_adjustments)
        .with("liquidity_factors", liquidity)
        .with("expected_yields", yields)
}

/// Portfolios of 3, 5, 10 and 15 assets, each sampled from `seed`.
pub fn portfolio_sizes(seed: u64) -> Scenario {
    [3, 5, 10, 15]
        .iter()
        .fold(Scenario::new("portfolio_sizes"), |scenario, &size| {
            scenario.asset(
                format!("PORTFOLIO_{:02}", size),
                sample_portfolio(size, seed),
            )
        })
}

/// Data-stewardship value over volume × jurisdictions × compliance, with
/// processing time at 0.08 hours per GB.
pub fn stewardship_grid() -> Scenario {
    let mut scenario = Scenario::new("stewardship_grid");
    let mut t = 0;
    for volume in [1.0, 10.0, 100.0, 1000.0] {
        for jurisdictions in [1.0, 2.0, 5.0, 10.0] {
            for compliance in [0.7, 0.8, 0.9, 0.95] {
                scenario = scenario.time_step(
                    t,
                    RawParameters::new()
                        .with("data_volume_gb", volume)
                        .with("jurisdictions", jurisdictions)
                        .with("compliance_score", compliance)
                        .with("processing_time_hours", volume * PROCESSING_HOURS_PER_GB),
                );
                t += 1;
            }
        }
    }
    scenario
}

/// Blend scores for 0% to 80% sodium of a 100 kWh installation.
pub fn blend_sweep() -> Scenario {
    let shared = RawParameters::new()
        .with("li_cost_per_kwh", 150.0)
        .with("na_cost_per_kwh", 80.0)
        .with("performance_target", 0.85);

    [0.0, 0.2, 0.4, 0.6, 0.8].iter().enumerate().fold(
        Scenario::new("blend_sweep").with_shared(shared),
        |scenario, (t, &na_ratio)| {
            scenario.time_step(
                t as u64,
                RawParameters::new()
                    .with("li_capacity", BLEND_TOTAL_CAPACITY * (1.0 - na_ratio))
                    .with("na_capacity", BLEND_TOTAL_CAPACITY * na_ratio),
            )
        },
    )
}

/// Every demo scenario, one per calculator, in [`CalculatorKind::all`] order.
pub fn all(seed: u64) -> Vec<DemoScenario> {
    CalculatorKind::all()
        .into_iter()
        .map(|kind| DemoScenario {
            kind,
            scenario: for_kind(kind, seed),
        })
        .collect()
}

/// The demo scenario for one calculator.
pub fn for_kind(kind: CalculatorKind, seed: u64) -> Scenario {
    match kind {
        CalculatorKind::CarbonCredit => carbon_energy_sweep(),
        CalculatorKind::ChargingRate => charging_grid(),
        CalculatorKind::StationIntegrity => integrity_grid(),
        CalculatorKind::PortfolioValuation => portfolio_sizes(seed),
        CalculatorKind::DataStewardship => stewardship_grid(),
        CalculatorKind::ChemistryBlend => blend_sweep(),
    }
}

/// Runs demo scenarios in parallel, one task per scenario.
///
/// `result[i]` belongs to `demos[i]`.
pub fn run_all(
    runner: &ScenarioRunner,
    demos: &[DemoScenario],
) -> Vec<Result<ScenarioRun, RunError>> {
    parallel_map(demos, |demo| runner.run(&demo.kind, &demo.scenario))
}
