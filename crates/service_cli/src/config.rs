//! CLI configuration management
//!
//! Handles loading configuration from an `lcis.toml` file, environment
//! variables and command-line flags.
//!
//! Priority (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (`LCIS_LOG_LEVEL`, `LCIS_FAILURE_POLICY`,
//!    `LCIS_PARALLEL_THRESHOLD`)
//! 3. Config file
//! 4. Default values

use std::path::{Path, PathBuf};
use std::str::FromStr;

use lcis_portfolio::parallel::{ParallelConfig, DEFAULT_BATCH_SIZE, DEFAULT_PARALLEL_THRESHOLD};
use lcis_portfolio::scenario::{FailurePolicy, RunnerConfig};
use serde::Deserialize;
use thiserror::Error;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "lcis.toml";

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "LCIS_LOG_LEVEL";
/// Environment variable overriding the failure policy.
pub const ENV_FAILURE_POLICY: &str = "LCIS_FAILURE_POLICY";
/// Environment variable overriding the parallel threshold.
pub const ENV_PARALLEL_THRESHOLD: &str = "LCIS_PARALLEL_THRESHOLD";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown log level name.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Config file unreadable or malformed.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Every problem found while building the configuration.
    #[error("Invalid configuration:\n  {}", .0.join("\n  "))]
    Invalid(Vec<String>),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Everything
    Trace,
    /// Per-step detail
    Debug,
    /// Run summaries
    Info,
    /// Failed steps and warnings
    #[default]
    Warn,
    /// Errors only
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Values as written in `lcis.toml`; parsed and checked by [`build_config`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    log_level: Option<String>,
    failure_policy: Option<String>,
    parallel_threshold: Option<usize>,
    batch_size: Option<usize>,
}

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: LogLevel,
    /// Failure policy for scenario runs
    pub failure_policy: FailurePolicy,
    /// Step count at which runs go parallel
    pub parallel_threshold: usize,
    /// Minimum steps per rayon task
    pub batch_size: usize,
    /// File the configuration was read from, if any
    pub source: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            failure_policy: FailurePolicy::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            batch_size: DEFAULT_BATCH_SIZE,
            source: None,
        }
    }
}

impl CliConfig {
    /// Runner configuration for scenario runs.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig::default()
            .with_policy(self.failure_policy)
            .with_parallel(ParallelConfig::new(self.batch_size, self.parallel_threshold))
    }

    /// Validate the configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();
        if self.parallel_threshold == 0 {
            problems.push("parallel_threshold must be at least 1".to_string());
        }
        if self.batch_size == 0 {
            problems.push("batch_size must be at least 1".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}

/// Overrides taken from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<String>,
    /// Failure policy override
    pub failure_policy: Option<String>,
    /// Parallel threshold override
    pub parallel_threshold: Option<usize>,
    /// `--verbose`: raises the log level to at least debug
    pub verbose: bool,
}

/// Build configuration from all sources, reading the process environment.
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    build_config_with_env(cli, |name| std::env::var(name).ok())
}

/// Build configuration from all sources with an explicit environment lookup.
///
/// Every bad value from every layer is reported together.
pub fn build_config_with_env<E>(cli: &CliArgs, env: E) -> Result<CliConfig, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let mut config = CliConfig::default();
    let mut problems = Vec::new();

    let file_path = match &cli.config_file {
        Some(path) => Some(path.clone()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    };

    if let Some(path) = file_path {
        let file = read_file_config(&path)?;
        apply_layer(
            &mut config,
            &mut problems,
            "config file",
            file.log_level,
            file.failure_policy,
            file.parallel_threshold.map(Ok),
        );
        if let Some(batch_size) = file.batch_size {
            config.batch_size = batch_size;
        }
        config.source = Some(path);
    }

    let env_threshold = env(ENV_PARALLEL_THRESHOLD).map(|raw| {
        raw.trim()
            .parse::<usize>()
            .map_err(|_| format!("{}: '{}' is not a whole number", ENV_PARALLEL_THRESHOLD, raw))
    });
    apply_layer(
        &mut config,
        &mut problems,
        "environment",
        env(ENV_LOG_LEVEL),
        env(ENV_FAILURE_POLICY),
        env_threshold,
    );

    apply_layer(
        &mut config,
        &mut problems,
        "command line",
        cli.log_level.clone(),
        cli.failure_policy.clone(),
        cli.parallel_threshold.map(Ok),
    );
    if cli.verbose && config.log_level as u8 > LogLevel::Debug as u8 {
        config.log_level = LogLevel::Debug;
    }

    if let Err(ConfigError::Invalid(more)) = config.validate() {
        problems.extend(more);
    }
    if problems.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Invalid(problems))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    toml::from_str(&content).map_err(|e| {
        ConfigError::FileError(format!("Failed to parse {}: {}", path.display(), e))
    })
}

fn apply_layer(
    config: &mut CliConfig,
    problems: &mut Vec<String>,
    layer: &str,
    log_level: Option<String>,
    failure_policy: Option<String>,
    parallel_threshold: Option<Result<usize, String>>,
) {
    if let Some(raw) = log_level {
        match LogLevel::from_str(&raw) {
            Ok(level) => config.log_level = level,
            Err(e) => problems.push(format!("{}: {}", layer, e)),
        }
    }
    if let Some(raw) = failure_policy {
        match FailurePolicy::from_str(&raw) {
            Ok(policy) => config.failure_policy = policy,
            Err(e) => problems.push(format!("{}: {}", layer, e)),
        }
    }
    match parallel_threshold {
        Some(Ok(threshold)) => config.parallel_threshold = threshold,
        Some(Err(e)) => problems.push(format!("{}: {}", layer, e)),
        None => {}
    }
}
