//! Criterion benchmarks for scenario runs and aggregation.
//!
//! Benchmarks cover:
//! - Sequential vs rayon-parallel runs over growing step counts
//! - Batch summaries of completed runs
//! - The full demo set

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lcis_core::types::RawParameters;
use lcis_models::calculators::{CalculatorKind, CarbonCredit};
use lcis_portfolio::aggregation::{summarize_run, summarize_run_weighted};
use lcis_portfolio::demo;
use lcis_portfolio::parallel::ParallelConfig;
use lcis_portfolio::scenario::{RunnerConfig, Scenario, ScenarioRunner};

/// Carbon scenario with `n_steps` synthetic energy readings.
fn carbon_scenario(n_steps: usize) -> Scenario {
    let shared = RawParameters::new()
        .with("efficiency", 0.92)
        .with("grid_carbon_intensity", 0.4)
        .with("clean_ratio", 0.7)
        .with("base_credit_rate", 0.1);

    (0..n_steps).fold(Scenario::new("bench").with_shared(shared), |s, t| {
        let energy = 5.0 + ((t * 37) % 100) as f64;
        s.time_step(t as u64, RawParameters::new().with("energy_delivered", energy))
    })
}

fn bench_runner(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenario_run");

    for n_steps in [100, 1_000, 10_000] {
        let scenario = carbon_scenario(n_steps);

        let sequential =
            ScenarioRunner::new(RunnerConfig::default().with_parallel(ParallelConfig::sequential()));
        group.bench_with_input(
            BenchmarkId::new("sequential", n_steps),
            &scenario,
            |b, scenario| b.iter(|| sequential.run(&CarbonCredit, black_box(scenario))),
        );

        let parallel =
            ScenarioRunner::new(RunnerConfig::default().with_parallel(ParallelConfig::always()));
        group.bench_with_input(
            BenchmarkId::new("parallel", n_steps),
            &scenario,
            |b, scenario| b.iter(|| parallel.run(&CarbonCredit, black_box(scenario))),
        );
    }

    group.finish();
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for n_steps in [1_000, 10_000] {
        let run = ScenarioRunner::default()
            .run(&CarbonCredit, &carbon_scenario(n_steps))
            .expect("bench scenario runs");
        let weights: Vec<f64> = (0..n_steps).map(|i| 1.0 + (i % 7) as f64).collect();

        group.bench_with_input(BenchmarkId::new("summarize_run", n_steps), &run, |b, run| {
            b.iter(|| summarize_run(black_box(run)))
        });
        group.bench_with_input(
            BenchmarkId::new("summarize_run_weighted", n_steps),
            &run,
            |b, run| b.iter(|| summarize_run_weighted(black_box(run), black_box(&weights))),
        );
    }

    group.finish();
}

fn bench_demo(c: &mut Criterion) {
    let demos = demo::all(demo::DEFAULT_SEED);
    let runner = ScenarioRunner::default();

    c.bench_function("demo_run_all", |b| {
        b.iter(|| demo::run_all(&runner, black_box(&demos)))
    });

    let portfolio = demo::portfolio_sizes(demo::DEFAULT_SEED);
    c.bench_function("demo_portfolio_sizes", |b| {
        b.iter(|| runner.run(&CalculatorKind::PortfolioValuation, black_box(&portfolio)))
    });
}

criterion_group!(benches, bench_runner, bench_aggregation, bench_demo);
criterion_main!(benches);
