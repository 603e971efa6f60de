//! Scenario execution engine.
//!
//! Each step layers its inputs over the scenario's shared inputs, validates
//! them against the calculator's schema and evaluates. A step that fails
//! becomes a [`StepFailure`] at its own position; under
//! [`FailurePolicy::FailFast`] the first failure by position aborts the run.
//!
//! Runs at or above the parallel threshold evaluate steps with rayon. The
//! cancellable variant always runs sequentially so that it can stop at a
//! step boundary.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use lcis_core::schema::InputSchema;
use lcis_core::traits::Calculator;
use lcis_core::types::EvaluationError;

use super::{Scenario, ScenarioRun, ScenarioStep, StepEntry, StepFailure};
use crate::error::RunError;
use crate::parallel::{map_indexed, ParallelConfig};

/// What the runner does with a failing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FailurePolicy {
    /// Record the failure and keep going
    #[default]
    Continue,
    /// Abort the run on the first failure by position
    FailFast,
}

impl FailurePolicy {
    /// Stable name ("continue" or "fail-fast").
    pub fn name(&self) -> &'static str {
        match self {
            FailurePolicy::Continue => "continue",
            FailurePolicy::FailFast => "fail-fast",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "fail-fast" | "fail_fast" | "failfast" => Ok(FailurePolicy::FailFast),
            other => Err(format!(
                "unknown failure policy '{}' (expected 'continue' or 'fail-fast')",
                other
            )),
        }
    }
}

/// Runner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunnerConfig {
    /// Failure handling
    pub policy: FailurePolicy,
    /// When to evaluate steps in parallel
    pub parallel: ParallelConfig,
}

impl RunnerConfig {
    /// Sets the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the parallel configuration.
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Runs a calculator over every step of a scenario.
///
/// # Examples
///
/// ```
/// use lcis_core::types::RawParameters;
/// use lcis_models::calculators::CalculatorKind;
/// use lcis_portfolio::scenario::{FailurePolicy, RunnerConfig, Scenario, ScenarioRunner};
///
/// let scenario = Scenario::new("blend")
///     .time_step(0, RawParameters::new().with("li_capacity", 100.0).with("na_capacity", 0.0))
///     .time_step(1, RawParameters::new().with("li_capacity", 0.0).with("na_capacity", 0.0));
///
/// let runner = ScenarioRunner::default();
/// let run = runner.run(&CalculatorKind::ChemistryBlend, &scenario).unwrap();
/// assert_eq!(run.completed_count(), 1);
/// assert_eq!(run.failure_count(), 1);
///
/// let strict = ScenarioRunner::new(RunnerConfig::default().with_policy(FailurePolicy::FailFast));
/// assert!(strict.run(&CalculatorKind::ChemistryBlend, &scenario).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: RunnerConfig,
}

impl ScenarioRunner {
    /// Creates a runner.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Runner configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs `calculator` over every step of `scenario`.
    ///
    /// # Returns
    ///
    /// One entry per step, `entries()[i]` for step `i`.
    ///
    /// # Errors
    ///
    /// `RunError::StepFailed` with the first failing step by position,
    /// under [`FailurePolicy::FailFast`] only.
    pub fn run<C>(&self, calculator: &C, scenario: &Scenario) -> Result<ScenarioRun, RunError>
    where
        C: Calculator + ?Sized,
    {
        let schema = calculator.schema();
        let steps = scenario.steps();
        let parallel = self.config.parallel.should_parallelize(steps.len());

        tracing::debug!(
            scenario = scenario.name(),
            metric = calculator.metric(),
            steps = steps.len(),
            parallel,
            "starting scenario run"
        );

        let entries = match self.config.policy {
            FailurePolicy::Continue => map_indexed(steps, &self.config.parallel, |index, step| {
                evaluate_step(calculator, &schema, scenario, index, step)
            }),
            FailurePolicy::FailFast if parallel => {
                let entries = map_indexed(steps, &self.config.parallel, |index, step| {
                    evaluate_step(calculator, &schema, scenario, index, step)
                });
                if let Some(failure) = entries.iter().find_map(StepEntry::failure) {
                    return Err(abort(scenario, failure.clone()));
                }
                entries
            }
            FailurePolicy::FailFast => {
                let mut entries = Vec::with_capacity(steps.len());
                for (index, step) in steps.iter().enumerate() {
                    match evaluate_step(calculator, &schema, scenario, index, step) {
                        StepEntry::Failed(failure) => return Err(abort(scenario, failure)),
                        entry => entries.push(entry),
                    }
                }
                entries
            }
        };

        Ok(finish(scenario, calculator.metric(), entries, false))
    }

    /// Runs sequentially, checking `cancel` before every step.
    ///
    /// Once the flag is set no further step starts; the run holds the steps
    /// completed so far and reports itself as cancelled.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::atomic::AtomicBool;
    /// use lcis_core::types::RawParameters;
    /// use lcis_models::calculators::CalculatorKind;
    /// use lcis_portfolio::scenario::{Scenario, ScenarioRunner};
    ///
    /// let scenario = Scenario::new("stopped")
    ///     .time_step(0, RawParameters::new().with("li_capacity", 1.0).with("na_capacity", 1.0));
    ///
    /// let cancel = AtomicBool::new(true);
    /// let run = ScenarioRunner::default()
    ///     .run_with_cancellation(&CalculatorKind::ChemistryBlend, &scenario, &cancel)
    ///     .unwrap();
    /// assert!(run.is_cancelled());
    /// assert!(run.is_empty());
    /// ```
    pub fn run_with_cancellation<C>(
        &self,
        calculator: &C,
        scenario: &Scenario,
        cancel: &AtomicBool,
    ) -> Result<ScenarioRun, RunError>
    where
        C: Calculator + ?Sized,
    {
        let schema = calculator.schema();
        let steps = scenario.steps();
        let mut entries = Vec::with_capacity(steps.len());
        let mut cancelled = false;

        for (index, step) in steps.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!(
                    scenario = scenario.name(),
                    completed = index,
                    remaining = steps.len() - index,
                    "scenario run cancelled"
                );
                cancelled = true;
                break;
            }
            match evaluate_step(calculator, &schema, scenario, index, step) {
                StepEntry::Failed(failure) if self.config.policy == FailurePolicy::FailFast => {
                    return Err(abort(scenario, failure));
                }
                entry => entries.push(entry),
            }
        }

        Ok(finish(scenario, calculator.metric(), entries, cancelled))
    }
}

fn evaluate_step<C>(
    calculator: &C,
    schema: &InputSchema,
    scenario: &Scenario,
    index: usize,
    step: &ScenarioStep,
) -> StepEntry
where
    C: Calculator + ?Sized,
{
    let raw = step.inputs.layered_over(scenario.shared());
    let outcome = schema
        .validate(&raw)
        .map_err(EvaluationError::from)
        .and_then(|params| calculator.evaluate(&params));

    match outcome {
        Ok(record) => {
            tracing::debug!(
                index,
                key = %step.key,
                value = record.final_value(),
                clamped = record.clamped(),
                "step completed"
            );
            StepEntry::Completed {
                index,
                key: step.key.clone(),
                record,
            }
        }
        Err(error) => {
            tracing::warn!(
                index,
                key = %step.key,
                category = error.category(),
                error = %error,
                "step failed"
            );
            StepEntry::Failed(StepFailure {
                index,
                key: step.key.clone(),
                error,
            })
        }
    }
}

fn abort(scenario: &Scenario, failure: StepFailure) -> RunError {
    tracing::warn!(
        scenario = scenario.name(),
        index = failure.index,
        "aborting scenario run on first failure"
    );
    RunError::StepFailed(failure)
}

fn finish(
    scenario: &Scenario,
    metric: &str,
    entries: Vec<StepEntry>,
    cancelled: bool,
) -> ScenarioRun {
    let run = ScenarioRun::new(scenario.name(), metric, entries, cancelled);
    tracing::info!(
        scenario = run.scenario(),
        metric = run.metric(),
        completed = run.completed_count(),
        failed = run.failure_count(),
        cancelled,
        "scenario run finished"
    );
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::StepKey;
    use lcis_core::types::RawParameters;
    use lcis_models::calculators::{CalculatorKind, StationIntegrity};

    fn integrity_scenario(error_rates: &[f64]) -> Scenario {
        let shared = RawParameters::new()
            .with("verification_confidence", 1.0)
            .with("throughput_efficiency", 1.0);
        error_rates
            .iter()
            .enumerate()
            .fold(Scenario::new("integrity").with_shared(shared), |s, (t, &e)| {
                s.time_step(t as u64, RawParameters::new().with("error_rate", e))
            })
    }

    #[test]
    fn test_run_preserves_order_and_length() {
        let scenario = integrity_scenario(&[0.1, 0.2, 0.3]);
        let run = ScenarioRunner::default()
            .run(&StationIntegrity, &scenario)
            .unwrap();

        assert_eq!(run.len(), 3);
        assert_eq!(run.metric(), "station_integrity");
        let values: Vec<f64> = run.records().map(|r| r.final_value()).collect();
        assert_eq!(values, vec![0.9, 0.8, 0.7]);
        for (i, entry) in run.entries().iter().enumerate() {
            assert_eq!(entry.index(), i);
            assert_eq!(entry.key(), &StepKey::Time(i as u64));
        }
    }

    #[test]
    fn test_failure_recorded_at_position() {
        let scenario = integrity_scenario(&[0.1, 1.5, 0.3]);
        let run = ScenarioRunner::default()
            .run(&StationIntegrity, &scenario)
            .unwrap();

        assert_eq!(run.len(), 3);
        assert!(run.entries()[0].is_completed());
        let failure = run.entries()[1].failure().unwrap();
        assert_eq!(failure.index, 1);
        assert!(matches!(failure.error, EvaluationError::Validation(_)));
        assert!(run.entries()[2].is_completed());
    }

    #[test]
    fn test_fail_fast_reports_first_failure() {
        let scenario = integrity_scenario(&[0.1, -1.0, 2.0]);
        let runner =
            ScenarioRunner::new(RunnerConfig::default().with_policy(FailurePolicy::FailFast));

        match runner.run(&StationIntegrity, &scenario) {
            Err(RunError::StepFailed(failure)) => assert_eq!(failure.index, 1),
            other => panic!("Expected StepFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_parallel_fail_fast_reports_first_failure() {
        let mut rates = vec![0.1; 50];
        rates[17] = 3.0;
        rates[40] = -2.0;
        let scenario = integrity_scenario(&rates);
        let runner = ScenarioRunner::new(
            RunnerConfig::default()
                .with_policy(FailurePolicy::FailFast)
                .with_parallel(ParallelConfig::always()),
        );

        match runner.run(&StationIntegrity, &scenario) {
            Err(RunError::StepFailed(failure)) => assert_eq!(failure.index, 17),
            other => panic!("Expected StepFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let rates: Vec<f64> = (0..500).map(|i| (i % 100) as f64 / 100.0).collect();
        let scenario = integrity_scenario(&rates);

        let sequential = ScenarioRunner::new(
            RunnerConfig::default().with_parallel(ParallelConfig::sequential()),
        )
        .run(&StationIntegrity, &scenario)
        .unwrap();
        let parallel =
            ScenarioRunner::new(RunnerConfig::default().with_parallel(ParallelConfig::always()))
                .run(&StationIntegrity, &scenario)
                .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_dyn_calculator() {
        let scenario = integrity_scenario(&[0.25]);
        let calculator: &dyn Calculator = &CalculatorKind::StationIntegrity;
        let run = ScenarioRunner::default().run(calculator, &scenario).unwrap();
        assert_eq!(run.records().next().map(|r| r.final_value()), Some(0.75));
    }

    #[test]
    fn test_cancellation_not_requested_runs_all() {
        let scenario = integrity_scenario(&[0.1, 0.2]);
        let cancel = AtomicBool::new(false);
        let run = ScenarioRunner::default()
            .run_with_cancellation(&StationIntegrity, &scenario, &cancel)
            .unwrap();
        assert_eq!(run.len(), 2);
        assert!(!run.is_cancelled());
    }

    #[test]
    fn test_cancellation_mid_run_keeps_prefix() {
        struct CancelAfterFirst<'a> {
            flag: &'a AtomicBool,
        }

        impl Calculator for CancelAfterFirst<'_> {
            fn metric(&self) -> &'static str {
                StationIntegrity.metric()
            }

            fn schema(&self) -> InputSchema {
                StationIntegrity.schema()
            }

            fn evaluate(
                &self,
                params: &lcis_core::types::ParameterSet,
            ) -> Result<lcis_core::types::ResultRecord, EvaluationError> {
                self.flag.store(true, Ordering::Relaxed);
                StationIntegrity.evaluate(params)
            }
        }

        let cancel = AtomicBool::new(false);
        let calculator = CancelAfterFirst { flag: &cancel };
        let scenario = integrity_scenario(&[0.1, 0.2, 0.3]);
        let run = ScenarioRunner::default()
            .run_with_cancellation(&calculator, &scenario, &cancel)
            .unwrap();

        assert!(run.is_cancelled());
        assert_eq!(run.len(), 1);
        assert_eq!(run.entries()[0].index(), 0);
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!("continue".parse::<FailurePolicy>(), Ok(FailurePolicy::Continue));
        assert_eq!("fail-fast".parse::<FailurePolicy>(), Ok(FailurePolicy::FailFast));
        assert_eq!("FAIL_FAST".parse::<FailurePolicy>(), Ok(FailurePolicy::FailFast));
        assert!("sometimes".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::FailFast.to_string(), "fail-fast");
    }
}
