//! # lcis_portfolio (L3: Application)
//!
//! Scenario execution and portfolio-level aggregation on top of the
//! formula calculators.
//!
//! This crate provides:
//! - Scenarios: named, ordered sequences of time steps or assets with
//!   shared inputs (`scenario`)
//! - A scenario runner with per-step failure capture, fail-fast policy,
//!   rayon parallelism and cooperative cancellation (`scenario::runner`)
//! - Aggregation of result records into portfolio summaries (`aggregation`)
//! - Rayon helpers (`parallel`)
//! - Reproducible demo scenarios (`demo`)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          lcis_portfolio (L3)            │
//! ├─────────────────────────────────────────┤
//! │  scenario/     - Scenario, Runner      │
//! │  aggregation/  - Summary, Accumulator  │
//! │  parallel/     - Rayon utilities       │
//! │  demo          - Sample scenarios      │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │           lcis_models (L2)              │
//! │  Calculators and blend optimiser        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use lcis_core::types::RawParameters;
//! use lcis_models::calculators::CalculatorKind;
//! use lcis_portfolio::aggregation::{summarize_run, Statistic};
//! use lcis_portfolio::scenario::{RunnerConfig, Scenario, ScenarioRunner};
//!
//! let shared = RawParameters::new()
//!     .with("verification_confidence", 1.0)
//!     .with("throughput_efficiency", 0.5);
//!
//! let scenario = Scenario::new("integrity")
//!     .with_shared(shared)
//!     .time_step(0, RawParameters::new().with("error_rate", 0.0))
//!     .time_step(1, RawParameters::new().with("error_rate", 0.5));
//!
//! let runner = ScenarioRunner::new(RunnerConfig::default());
//! let run = runner.run(&CalculatorKind::StationIntegrity, &scenario).unwrap();
//! assert_eq!(run.len(), 2);
//!
//! let summary = summarize_run(&run).unwrap();
//! assert_eq!(summary.count, 2);
//! assert_eq!(summary.total, Statistic::Value(0.75));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for scenarios, runs and summaries

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod aggregation;
pub mod demo;
pub mod error;
pub mod parallel;
pub mod scenario;

pub use error::{AggregationError, RunError};
