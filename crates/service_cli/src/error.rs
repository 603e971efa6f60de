//! CLI error types.

use std::path::PathBuf;

use lcis_core::types::{EvaluationError, ValidationError};
use lcis_portfolio::{AggregationError, RunError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by `lcis` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file missing.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input file unreadable.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid TOML for its purpose.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No calculator with this name.
    #[error("Unknown calculator '{0}'. Run `lcis list` for the available names")]
    UnknownCalculator(String),

    /// Bad command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Inputs failed validation; every violation is listed.
    #[error("{} validation error(s):\n  {}", .0.len(), format_violations(.0))]
    Invalid(Vec<ValidationError>),

    /// A calculator call failed.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// A fail-fast scenario run aborted.
    #[error(transparent)]
    Run(#[from] RunError),

    /// Summarising a run failed.
    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    /// JSON output failed.
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    /// `lcis check` found problems.
    #[error("Check failed with {0} problem(s)")]
    CheckFailed(usize),
}

fn format_violations(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n  ")
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_calculator_display() {
        let err = CliError::UnknownCalculator("carbon".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown calculator 'carbon'. Run `lcis list` for the available names"
        );
    }

    #[test]
    fn test_invalid_lists_every_violation() {
        let err = CliError::Invalid(vec![
            ValidationError::MissingField {
                field: "efficiency".to_string(),
            },
            ValidationError::MissingField {
                field: "clean_ratio".to_string(),
            },
        ]);
        let text = err.to_string();
        assert!(text.starts_with("2 validation error(s):"));
        assert!(text.contains("'efficiency'"));
        assert!(text.contains("'clean_ratio'"));
    }

    #[test]
    fn test_file_not_found_display() {
        let err = CliError::FileNotFound(PathBuf::from("missing.toml"));
        assert_eq!(err.to_string(), "File not found: missing.toml");
    }
}
