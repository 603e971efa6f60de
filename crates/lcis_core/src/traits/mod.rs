//! Core traits for formula calculators.
//!
//! This module defines the `Calculator` abstraction implemented by every
//! metric in `lcis_models`. Calculators are dispatched statically through
//! an enum in Layer 2; the trait fixes the shared contract.

pub mod calculator;

pub use calculator::Calculator;
