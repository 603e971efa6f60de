//! Numeric helpers shared by the calculators.
//!
//! This module provides:
//! - `clamp`: explicit clamping that never hides a NaN, plus finiteness and
//!   positivity guards that turn bad intermediates into typed errors

pub mod clamp;

pub use clamp::{
    check_band, clamp_range, clamp_unit, ensure_finite, ensure_positive_divisor,
    ensure_positive_factor,
};
