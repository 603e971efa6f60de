//! Criterion benchmarks for the lcis_models calculators.
//!
//! Benchmarks cover:
//! - Validation plus evaluation of each calculator through `CalculatorKind`
//! - Portfolio valuation with growing asset counts
//! - Blend scan at several grid steps

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lcis_core::traits::Calculator;
use lcis_core::types::RawParameters;
use lcis_models::calculators::{CalculatorKind, PortfolioValuation};
use lcis_models::optimiser::{optimise_blend, BlendScanConfig};

/// Representative inputs for each calculator.
fn sample_inputs(kind: CalculatorKind) -> RawParameters {
    match kind {
        CalculatorKind::CarbonCredit => RawParameters::new()
            .with("energy_delivered", 25.0)
            .with("efficiency", 0.92)
            .with("grid_carbon_intensity", 0.4)
            .with("clean_ratio", 0.7)
            .with("base_credit_rate", 0.1),
        CalculatorKind::ChargingRate => RawParameters::new()
            .with("state_of_health", 0.85)
            .with("temperature_c", 32.0)
            .with("depth_of_discharge_pct", 80.0),
        CalculatorKind::StationIntegrity => RawParameters::new()
            .with("error_rate", 0.02)
            .with("verification_confidence", 0.99)
            .with("throughput_efficiency", 0.8)
            .with("verification_samples", 50.0),
        CalculatorKind::PortfolioValuation => portfolio_inputs(5),
        CalculatorKind::DataStewardship => RawParameters::new()
            .with("data_volume_gb", 100.0)
            .with("jurisdictions", 5.0)
            .with("compliance_score", 0.9)
            .with("processing_time_hours", 8.0),
        CalculatorKind::ChemistryBlend => RawParameters::new()
            .with("li_capacity", 60.0)
            .with("na_capacity", 40.0),
    }
}

/// Synthetic portfolio of `n` assets with equal weights.
fn portfolio_inputs(n: usize) -> RawParameters {
    let values: Vec<f64> = (0..n).map(|i| 50_000.0 + 10_000.0 * i as f64).collect();
    let weight = 1.0 / n as f64;
    RawParameters::new()
        .with("asset_values", values)
        .with("weights", vec![weight; n])
        .with("risk_adjustments", vec![0.85; n])
        .with("liquidity_factors", vec![0.8; n])
        .with("expected_yields", vec![0.07; n])
}

/// Benchmark validate + evaluate for every calculator.
fn bench_evaluate_raw(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_raw");

    for kind in CalculatorKind::all() {
        let raw = sample_inputs(kind);
        group.bench_with_input(BenchmarkId::new("kind", kind.name()), &raw, |b, raw| {
            b.iter(|| kind.evaluate_raw(black_box(raw)));
        });
    }

    group.finish();
}

/// Benchmark portfolio valuation scaling with asset count.
fn bench_portfolio_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("portfolio_valuation");

    for n in [5, 50, 500] {
        let raw = portfolio_inputs(n);
        group.bench_with_input(BenchmarkId::new("assets", n), &raw, |b, raw| {
            b.iter(|| PortfolioValuation.evaluate_raw(black_box(raw)));
        });
    }

    group.finish();
}

/// Benchmark the blend scan at several grid resolutions.
fn bench_blend_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("blend_scan");
    let base = RawParameters::new();

    for step in [0.1, 0.01, 0.001] {
        let config = BlendScanConfig::with_step(step);
        group.bench_with_input(BenchmarkId::new("step", step), &config, |b, config| {
            b.iter(|| optimise_blend(black_box(&base), config));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate_raw,
    bench_portfolio_scaling,
    bench_blend_scan
);
criterion_main!(benches);
