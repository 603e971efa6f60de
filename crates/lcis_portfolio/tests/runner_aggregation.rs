//! End-to-end tests: scenarios through the runner into summaries.

use approx::assert_relative_eq;
use lcis_core::types::RawParameters;
use lcis_models::calculators::{CalculatorKind, CarbonCredit, ChemistryBlend};
use lcis_portfolio::aggregation::{
    summarize, summarize_component, summarize_run, summarize_run_weighted, Statistic,
    SummaryAccumulator,
};
use lcis_portfolio::demo;
use lcis_portfolio::parallel::ParallelConfig;
use lcis_portfolio::scenario::{RunnerConfig, Scenario, ScenarioRunner, StepKey};
use lcis_portfolio::AggregationError;
use proptest::prelude::*;

fn carbon_scenario(energies: &[f64]) -> Scenario {
    let shared = RawParameters::new()
        .with("efficiency", 0.95)
        .with("grid_carbon_intensity", 0.4)
        .with("clean_ratio", 0.3)
        .with("base_credit_rate", 0.0865)
        .with("quality_factor", 0.94);
    energies
        .iter()
        .enumerate()
        .fold(Scenario::new("carbon").with_shared(shared), |s, (t, &e)| {
            s.time_step(t as u64, RawParameters::new().with("energy_delivered", e))
        })
}

#[test]
fn test_reference_carbon_through_runner() {
    let run = ScenarioRunner::default()
        .run(&CarbonCredit, &carbon_scenario(&[10.0]))
        .unwrap();
    let expected = 10.0 * 0.95 * (1.0 - 0.4 * 0.3) * 0.0865 * 0.94;
    let value = run.records().next().unwrap().final_value();
    assert!((value - expected).abs() < 1e-9);
}

#[test]
fn test_failed_steps_counted_not_aggregated() {
    let scenario = Scenario::new("blend")
        .time_step(0, RawParameters::new().with("li_capacity", 100.0).with("na_capacity", 0.0))
        .time_step(1, RawParameters::new().with("li_capacity", 0.0).with("na_capacity", 0.0))
        .time_step(2, RawParameters::new().with("li_capacity", 100.0).with("na_capacity", 0.0));

    let run = ScenarioRunner::default().run(&ChemistryBlend, &scenario).unwrap();
    let summary = summarize_run(&run).unwrap();

    assert_eq!(summary.metric.as_deref(), Some("chemistry_blend"));
    assert_eq!(summary.count, 2);
    assert_eq!(summary.failure_count, 1);
    assert_relative_eq!(summary.mean.value().unwrap(), 0.6, epsilon = 1e-12);
}

#[test]
fn test_run_weights_indexed_by_step() {
    let scenario = Scenario::new("blend")
        .time_step(0, RawParameters::new().with("li_capacity", 100.0).with("na_capacity", 0.0))
        .time_step(1, RawParameters::new().with("li_capacity", 0.0).with("na_capacity", 0.0))
        .time_step(2, RawParameters::new().with("li_capacity", 0.0).with("na_capacity", 100.0));
    let run = ScenarioRunner::default().run(&ChemistryBlend, &scenario).unwrap();

    // The failed step's weight (and its invalid value) is skipped.
    let summary = summarize_run_weighted(&run, &[1.0, -5.0, 3.0]).unwrap();
    let pure_li = 0.6;
    let pure_na = 0.3 * 0.75;
    assert_relative_eq!(
        summary.weighted_mean.and_then(|s| s.value()).unwrap(),
        (pure_li + 3.0 * pure_na) / 4.0,
        epsilon = 1e-12
    );

    assert_eq!(
        summarize_run_weighted(&run, &[1.0, 1.0]),
        Err(AggregationError::WeightCountMismatch {
            expected: 3,
            found: 2
        })
    );
}

#[test]
fn test_empty_run_has_no_data() {
    let run = ScenarioRunner::default()
        .run(&CarbonCredit, &Scenario::new("empty"))
        .unwrap();
    let summary = summarize_run(&run).unwrap();

    assert!(run.is_empty());
    assert_eq!(summary.count, 0);
    assert_eq!(summary.metric.as_deref(), Some("carbon_credit"));
    assert_eq!(summary.mean, Statistic::NoData);

    let weighted = summarize_run_weighted(&run, &[]).unwrap();
    assert_eq!(weighted.weighted_mean, Some(Statistic::NoData));
}

#[test]
fn test_quality_factor_rollup() {
    let run = ScenarioRunner::default()
        .run(&CarbonCredit, &carbon_scenario(&[1.0, 2.0, 3.0]))
        .unwrap();
    let records: Vec<_> = run.records().cloned().collect();

    let summary = summarize_component(&records, "quality_factor").unwrap();
    assert_eq!(summary.component.as_deref(), Some("quality_factor"));
    assert_relative_eq!(summary.mean.value().unwrap(), 0.94, epsilon = 1e-12);

    assert!(matches!(
        summarize_component(&records, "no_such_factor"),
        Err(AggregationError::MissingComponent { index: 0, .. })
    ));
}

#[test]
fn test_demo_portfolio_keys() {
    let scenario = demo::portfolio_sizes(demo::DEFAULT_SEED);
    let run = ScenarioRunner::default()
        .run(&CalculatorKind::PortfolioValuation, &scenario)
        .unwrap();

    let keys: Vec<_> = run.entries().iter().map(|e| e.key().clone()).collect();
    assert_eq!(keys[0], StepKey::Asset("PORTFOLIO_03".to_string()));
    assert_eq!(keys[3], StepKey::Asset("PORTFOLIO_15".to_string()));
    for record in run.records() {
        assert!(record.final_value() > 0.0);
        assert!(record.warnings().is_empty());
    }
}

#[test]
fn test_demo_blend_sweep_prefers_lithium() {
    let run = ScenarioRunner::default()
        .run(&ChemistryBlend, &demo::blend_sweep())
        .unwrap();
    let summary = summarize_run(&run).unwrap();

    let first = run.records().next().unwrap().final_value();
    assert_eq!(summary.max, Statistic::Value(first));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn test_runner_preserves_order_and_length(
        energies in proptest::collection::vec(-10.0..200.0_f64, 0..60),
        parallel in any::<bool>(),
    ) {
        let config = if parallel {
            ParallelConfig::always()
        } else {
            ParallelConfig::sequential()
        };
        let runner = ScenarioRunner::new(RunnerConfig::default().with_parallel(config));
        let run = runner.run(&CarbonCredit, &carbon_scenario(&energies)).unwrap();

        prop_assert_eq!(run.len(), energies.len());
        for (i, entry) in run.entries().iter().enumerate() {
            prop_assert_eq!(entry.index(), i);
            prop_assert_eq!(entry.key(), &StepKey::Time(i as u64));
            // Negative energy is out of domain; everything else evaluates.
            prop_assert_eq!(entry.is_completed(), energies[i] >= 0.0);
        }
    }

    #[test]
    fn test_incremental_equals_batch(
        energies in proptest::collection::vec(0.0..500.0_f64, 0..40),
    ) {
        let run = ScenarioRunner::default()
            .run(&CarbonCredit, &carbon_scenario(&energies))
            .unwrap();
        let records: Vec<_> = run.records().cloned().collect();

        let mut acc = SummaryAccumulator::new();
        for record in &records {
            acc.push(record).unwrap();
        }
        prop_assert_eq!(acc.summary(), summarize(&records).unwrap());
    }

    #[test]
    fn test_mean_between_min_and_max(
        energies in proptest::collection::vec(0.0..500.0_f64, 1..40),
    ) {
        let run = ScenarioRunner::default()
            .run(&CarbonCredit, &carbon_scenario(&energies))
            .unwrap();
        let summary = summarize_run(&run).unwrap();

        let mean = summary.mean.value().unwrap();
        prop_assert!(summary.min.value().unwrap() <= mean + 1e-9);
        prop_assert!(mean <= summary.max.value().unwrap() + 1e-9);
    }
}
