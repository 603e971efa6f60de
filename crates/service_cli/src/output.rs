//! Rendering of records, runs and summaries.
//!
//! Everything goes to stdout through `println!` in the commands; these
//! functions only build the text so they can be tested.


use clap::ValueEnum;
use lcis_core::types::ResultRecord;
use lcis_models::optimiser::BlendOptimum;
use lcis_portfolio::aggregation::PortfolioSummary;
use lcis_portfolio::scenario::{ScenarioRun, StepEntry};
use serde::Serialize;

use crate::error::Result;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// A run together with its summary, as emitted by `lcis run`.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    /// Per-step outcomes
    pub run: &'a ScenarioRun,
    /// Aggregate over completed steps
    pub summary: &'a PortfolioSummary,
}

/// Serialise any output value as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Append `line` and a newline.
pub fn push_line(out: &mut String, line: impl AsRef<str>) {
    out.push_str(line.as_ref());
    out.push('\n');
}

/// Table view of a single record.
pub fn record_table(record: &ResultRecord) -> String {
    let mut out = format!(
        "{} = {} {}",
        record.metric(),
        record.final_value(),
        record.unit()
    );
    if record.clamped() {
        out.push_str(" (clamped)");
    }
    out.push('\n');

    let factors: Vec<_> = record.factors().collect();
    if !factors.is_empty() {
        out.push_str("  factors:\n");
        for c in factors {
            push_line(&mut out, format!("    {:<28} {}", c.name, c.value));
        }
    }
    let diagnostics: Vec<_> = record.diagnostics().collect();
    if !diagnostics.is_empty() {
        out.push_str("  diagnostics:\n");
        for c in diagnostics {
            push_line(&mut out, format!("    {:<28} {}", c.name, c.value));
        }
    }
    if !record.breakdown().is_empty() {
        out.push_str("  breakdown:\n");
        for entry in record.breakdown() {
            push_line(&mut out, format!("    {:<28} {}", entry.label, entry.value));
        }
    }
    if let Some(confidence) = record.confidence() {
        push_line(&mut out, format!("  confidence: {}", confidence));
    }
    for warning in record.warnings() {
        push_line(&mut out, format!("  warning: {}", warning));
    }
    out
}

/// Table view of a summary.
pub fn summary_table(summary: &PortfolioSummary) -> String {
    let mut out = String::new();
    let subject = match (&summary.metric, &summary.component) {
        (Some(metric), Some(component)) => format!("{}.{}", metric, component),
        (Some(metric), None) => metric.clone(),
        (None, _) => "(empty)".to_string(),
    };
    let unit = summary.unit.map(|u| format!(" [{}]", u)).unwrap_or_default();
    push_line(&mut out, format!("Summary of {}{}", subject, unit));
    push_line(&mut out, format!("  {:<14} {}", "count", summary.count));
    push_line(&mut out, format!("  {:<14} {}", "failures", summary.failure_count));
    push_line(&mut out, format!("  {:<14} {}", "total", summary.total));
    push_line(&mut out, format!("  {:<14} {}", "mean", summary.mean));
    push_line(&mut out, format!("  {:<14} {}", "min", summary.min));
    push_line(&mut out, format!("  {:<14} {}", "max", summary.max));
    if let Some(weighted) = &summary.weighted_mean {
        push_line(&mut out, format!("  {:<14} {}", "weighted mean", weighted));
    }
    out
}

/// Table view of a run: one row per step, then the summary.
pub fn run_table(run: &ScenarioRun, summary: &PortfolioSummary) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "Scenario '{}' ({}): {} step(s), {} completed, {} failed{}",
            run.scenario(),
            run.metric(),
            run.len(),
            run.completed_count(),
            run.failure_count(),
            if run.is_cancelled() { ", cancelled" } else { "" }
        ),
    );
    push_line(&mut out, format!("{:<6} {:<20} {:<8} {}", "STEP", "KEY", "STATUS", "VALUE"));
    for entry in run.entries() {
        let key = entry.key().to_string();
        match entry {
            StepEntry::Completed { index, record, .. } => {
                let flag = if record.warnings().is_empty() { "" } else { " !" };
                push_line(
                    &mut out,
                    format!(
                        "{:<6} {:<20} {:<8} {}{}",
                        index,
                        key,
                        "ok",
                        record.final_value(),
                        flag
                    ),
                );
            }
            StepEntry::Failed(failure) => {
                push_line(
                    &mut out,
                    format!(
                        "{:<6} {:<20} {:<8} {}: {}",
                        failure.index,
                        key,
                        "failed",
                        failure.error.category(),
                        failure.error
                    ),
                );
            }
        }
    }
    out.push('\n');
    out.push_str(&summary_table(summary));
    out
}

/// Table view of a blend scan.
pub fn blend_table(optimum: &BlendOptimum, show_curve: bool) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "Best sodium fraction {:.4} with score {}",
            optimum.sodium_fraction, optimum.score
        ),
    );
    if show_curve {
        push_line(&mut out, format!("{:<10} {}", "SODIUM", "SCORE"));
        for point in &optimum.curve {
            push_line(&mut out, format!("{:<10.4} {}", point.sodium_fraction, point.score));
        }
    }
    out.push('\n');
    out.push_str(&record_table(&optimum.record));
    out
}
