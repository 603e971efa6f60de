//! Run command implementation
//!
//! Runs a scenario file through the scenario runner and summarises the
//! completed steps.

use std::path::Path;

use lcis_portfolio::aggregation::{
    summarize_component, summarize_run, summarize_run_weighted, PortfolioSummary,
};
use lcis_portfolio::scenario::{ScenarioRun, ScenarioRunner};
use tracing::info;

use crate::config::CliConfig;
use crate::input::{load_scenario, LoadedScenario};
use crate::output::{run_table, to_json, OutputFormat, RunReport};
use crate::Result;

/// Run a loaded scenario and summarise it.
///
/// With `component`, the summary rolls up that component instead of the
/// final value; file weights are then not applied.
pub fn execute(
    loaded: &LoadedScenario,
    config: &CliConfig,
    component: Option<&str>,
) -> Result<(ScenarioRun, PortfolioSummary)> {
    let runner = ScenarioRunner::new(config.runner_config());
    let run = runner.run(&loaded.calculator, &loaded.scenario)?;

    let summary = match (component, &loaded.weights) {
        (Some(name), _) => {
            let records: Vec<_> = run.records().cloned().collect();
            let mut summary = summarize_component(&records, name)?;
            summary.failure_count = run.failure_count();
            summary
        }
        (None, Some(weights)) => summarize_run_weighted(&run, weights)?,
        (None, None) => summarize_run(&run)?,
    };
    Ok((run, summary))
}

/// Build the run output.
pub fn render(
    path: &Path,
    config: &CliConfig,
    component: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let loaded = load_scenario(path)?;
    info!(
        scenario = loaded.scenario.name(),
        calculator = %loaded.calculator,
        steps = loaded.scenario.len(),
        policy = %config.failure_policy,
        "Running scenario"
    );
    let (run, summary) = execute(&loaded, config, component)?;

    match format {
        OutputFormat::Json => to_json(&RunReport {
            run: &run,
            summary: &summary,
        }),
        OutputFormat::Table => Ok(run_table(&run, &summary)),
    }
}

/// Run the run command
pub fn run(
    path: &Path,
    config: &CliConfig,
    component: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    print!("{}", render(path, config, component, format)?);
    Ok(())
}
