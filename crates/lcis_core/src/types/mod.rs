//! Core value types shared by every calculator.
//!
//! This module provides:
//! - `error`: the three-way error taxonomy plus the `EvaluationError` wrapper
//! - `params`: raw parameter maps and validated parameter sets
//! - `record`: immutable result records with their combination rule

pub mod error;
pub mod params;
pub mod record;

pub use error::{ComputationError, DomainError, EvaluationError, ValidationError};
pub use params::{ParamValue, ParameterSet, RawParameters};
pub use record::{
    BreakdownEntry, Combination, Combined, Component, ComponentRole, RecordBuilder, ResultRecord,
    Unit,
};
