//! Explicit clamping and guard functions.
//!
//! `f64::max`/`f64::min` silently replace NaN with the other operand, which
//! would let a broken intermediate pass as a valid bound. The helpers here
//! pass NaN through unchanged so the record builder rejects it later.

use crate::types::{ComputationError, DomainError};

/// Clamps `x` into [0, 1], passing NaN through.
///
/// # Examples
/// ```
/// use lcis_core::math::clamp_unit;
///
/// assert_eq!(clamp_unit(1.4), 1.0);
/// assert_eq!(clamp_unit(-0.2), 0.0);
/// assert!(clamp_unit(f64::NAN).is_nan());
/// ```
#[inline]
pub fn clamp_unit(x: f64) -> f64 {
    clamp_range(x, 0.0, 1.0)
}

/// Clamps `x` into [min, max], passing NaN through.
///
/// Never panics. Callers are expected to have validated the band with
/// [`check_band`]; with `min > max` the result is `max` for any `x`
/// above it and `min` otherwise.
///
/// # Arguments
/// * `x` - Value to clamp
/// * `min` - Lower edge
/// * `max` - Upper edge
#[inline]
pub fn clamp_range(x: f64, min: f64, max: f64) -> f64 {
    if x.is_nan() {
        x
    } else if x > max {
        max
    } else if x < min {
        min
    } else {
        x
    }
}

/// Fails with `InvalidBand` when `min > max` or either edge is not finite.
pub fn check_band(min: f64, max: f64) -> Result<(), DomainError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(DomainError::InvalidBand { min, max })
    }
}

/// Returns `x` if finite, otherwise a `NonFinite` error naming it.
#[inline]
pub fn ensure_finite(name: &str, x: f64) -> Result<f64, ComputationError> {
    if x.is_finite() {
        Ok(x)
    } else {
        Err(ComputationError::NonFinite {
            name: name.to_string(),
            value: x,
        })
    }
}

/// Returns `x` if it is a usable divisor (finite and strictly positive).
///
/// # Examples
/// ```
/// use lcis_core::math::ensure_positive_divisor;
///
/// assert_eq!(ensure_positive_divisor("time_penalty", 0.5).unwrap(), 0.5);
/// assert!(ensure_positive_divisor("time_penalty", 0.0).is_err());
/// ```
#[inline]
pub fn ensure_positive_divisor(name: &str, x: f64) -> Result<f64, DomainError> {
    if x.is_finite() && x > 0.0 {
        Ok(x)
    } else {
        Err(DomainError::NonPositiveDivisor {
            name: name.to_string(),
            value: x,
        })
    }
}

/// Returns `x` if it lies in (0, 1].
#[inline]
pub fn ensure_positive_factor(name: &str, x: f64) -> Result<f64, DomainError> {
    if x > 0.0 && x <= 1.0 {
        Ok(x)
    } else {
        Err(DomainError::NonPositiveFactor {
            name: name.to_string(),
            value: x,
        })
    }
}
