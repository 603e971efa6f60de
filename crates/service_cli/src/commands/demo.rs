//! Demo command implementation
//!
//! Runs the built-in sample scenarios, one per calculator, and prints each
//! run with its summary. The random sample portfolio is seeded, so output
//! is reproducible for a given `--seed`.

use lcis_models::calculators::CalculatorKind;
use lcis_portfolio::aggregation::{summarize_run, PortfolioSummary};
use lcis_portfolio::demo::{self, DemoScenario};
use lcis_portfolio::scenario::{ScenarioRun, ScenarioRunner};
use serde::Serialize;
use tracing::info;

use crate::config::CliConfig;
use crate::output::{run_table, summary_table, to_json, OutputFormat};
use crate::{CliError, Result};

#[derive(Debug, Serialize)]
struct DemoReport {
    calculator: CalculatorKind,
    run: ScenarioRun,
    summary: PortfolioSummary,
}

fn select(calculator: Option<&str>, seed: u64) -> Result<Vec<DemoScenario>> {
    match calculator {
        Some(name) => {
            let kind = CalculatorKind::from_name(name)
                .ok_or_else(|| CliError::UnknownCalculator(name.to_string()))?;
            Ok(vec![DemoScenario {
                kind,
                scenario: demo::for_kind(kind, seed),
            }])
        }
        None => Ok(demo::all(seed)),
    }
}

/// Build the demo output.
///
/// # Arguments
/// * `calculator` - only run this calculator's demo
/// * `seed` - seed for the sample portfolio
/// * `summary_only` - skip the per-step rows in table output
pub fn render(
    calculator: Option<&str>,
    seed: u64,
    summary_only: bool,
    config: &CliConfig,
    format: OutputFormat,
) -> Result<String> {
    let demos = select(calculator, seed)?;
    info!(scenarios = demos.len(), seed, "Running demo scenarios");

    let runner = ScenarioRunner::new(config.runner_config());
    let mut reports = Vec::with_capacity(demos.len());
    for (entry, result) in demos.iter().zip(demo::run_all(&runner, &demos)) {
        let run = result?;
        let summary = summarize_run(&run)?;
        reports.push(DemoReport {
            calculator: entry.kind,
            run,
            summary,
        });
    }

    if format == OutputFormat::Json {
        return to_json(&reports);
    }

    let mut out = String::new();
    for report in &reports {
        if summary_only {
            out.push_str(&summary_table(&report.summary));
        } else {
            out.push_str(&run_table(&report.run, &report.summary));
        }
        out.push('\n');
    }
    Ok(out)
}

/// Run the demo command
pub fn run(
    calculator: Option<&str>,
    seed: u64,
    summary_only: bool,
    config: &CliConfig,
    format: OutputFormat,
) -> Result<()> {
    print!(
        "{}",
        render(calculator, seed, summary_only, config, format)?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_demos_summarised() {
        let text = render(None, demo::DEFAULT_SEED, true, &CliConfig::default(), OutputFormat::Table)
            .unwrap();
        for kind in CalculatorKind::all() {
            assert!(text.contains(&format!("Summary of {}", kind)), "missing {}", kind);
        }
    }

    #[test]
    fn test_demo_json_is_reproducible() {
        let config = CliConfig::default();
        let first = render(Some("portfolio_valuation"), 7, false, &config, OutputFormat::Json)
            .unwrap();
        let second = render(Some("portfolio_valuation"), 7, false, &config, OutputFormat::Json)
            .unwrap();
        assert_eq!(first, second);

        let value: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(value[0]["calculator"], "portfolio_valuation");
        assert_eq!(value[0]["summary"]["failure_count"], 0);
    }

    #[test]
    fn test_unknown_demo() {
        assert!(matches!(
            render(Some("nope"), 1, true, &CliConfig::default(), OutputFormat::Table),
            Err(CliError::UnknownCalculator(_))
        ));
    }
}
