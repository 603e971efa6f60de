//! LCIS CLI - Command Line Operations for the Formula Engine
//!
//! This is the operational entry point for the LCIS formula evaluation and
//! aggregation engine.
//!
//! # Commands
//!
//! - `lcis list [CALCULATOR]` - List calculators and their input schemas
//! - `lcis evaluate <CALCULATOR>` - Evaluate one calculator call
//! - `lcis run <SCENARIO>` - Run a scenario file and summarise it
//! - `lcis optimise-blend` - Scan sodium fractions for the best blend
//! - `lcis demo` - Run the built-in sample scenarios
//! - `lcis check <SCENARIO>...` - Validate scenario files and configuration
//!
//! # Configuration
//!
//! Settings come from CLI flags, then `LCIS_*` environment variables, then
//! `lcis.toml`, then defaults. Results go to stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod input;
mod output;

pub use error::{CliError, Result};

use config::{build_config, CliArgs, LogLevel};
use output::OutputFormat;

/// LCIS formula evaluation and aggregation CLI
#[derive(Parser)]
#[command(name = "lcis")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (defaults to ./lcis.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Failure policy for scenario runs (continue, fail-fast)
    #[arg(long, global = true)]
    failure_policy: Option<String>,

    /// Step count at which scenario runs go parallel
    #[arg(long, global = true)]
    parallel_threshold: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List calculators and their input schemas
    List {
        /// Only show this calculator
        calculator: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Evaluate one calculator call
    Evaluate {
        /// Calculator name (see `lcis list`)
        calculator: String,

        /// TOML file of parameters
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Parameter override, name=value (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Run a scenario file and summarise the results
    Run {
        /// Scenario TOML file
        scenario: PathBuf,

        /// Summarise this component instead of the final value
        #[arg(long)]
        component: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Find the sodium fraction that maximises the chemistry-blend score
    OptimiseBlend {
        /// TOML file of blend parameters
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Parameter override, name=value (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Distance between scanned fractions, in (0, 1]
        #[arg(long, default_value_t = 0.01)]
        step: f64,

        /// Print every scanned point
        #[arg(long)]
        curve: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Run the built-in sample scenarios
    Demo {
        /// Only run this calculator's demo
        #[arg(long)]
        calculator: Option<String>,

        /// Seed for the sample portfolio
        #[arg(long, default_value_t = lcis_portfolio::demo::DEFAULT_SEED)]
        seed: u64,

        /// Print summaries only
        #[arg(long)]
        summary_only: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Validate scenario files and configuration without evaluating
    Check {
        /// Scenario TOML files
        files: Vec<PathBuf>,
    },
}

/// Initialise tracing on stderr; `RUST_LOG` takes precedence over `level`.
fn init_tracing(level: LogLevel) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_filter_str()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = build_config(&CliArgs {
        config_file: cli.config,
        log_level: cli.log_level,
        failure_policy: cli.failure_policy,
        parallel_threshold: cli.parallel_threshold,
        verbose: cli.verbose,
    })?;
    init_tracing(config.log_level);
    debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::List { calculator, format } => {
            commands::list::run(calculator.as_deref(), format)
        }
        Commands::Evaluate {
            calculator,
            params,
            set,
            format,
        } => commands::evaluate::run(&calculator, params.as_deref(), &set, format),
        Commands::Run {
            scenario,
            component,
            format,
        } => commands::run::run(&scenario, &config, component.as_deref(), format),
        Commands::OptimiseBlend {
            params,
            set,
            step,
            curve,
            format,
        } => commands::optimise_blend::run(params.as_deref(), &set, step, curve, format),
        Commands::Demo {
            calculator,
            seed,
            summary_only,
            format,
        } => commands::demo::run(calculator.as_deref(), seed, summary_only, &config, format),
        Commands::Check { files } => commands::check::run(&files, &config),
    }
}
