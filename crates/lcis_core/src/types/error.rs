//! Error types for structured error handling.
//!
//! This module provides:
//! - `ValidationError`: input missing or outside its declared domain
//! - `ComputationError`: a non-finite intermediate or result
//! - `DomainError`: a formula-specific precondition was violated
//! - `EvaluationError`: the union surfaced by a calculator call
//!
//! None of these is ever converted into a default numeric value.

use thiserror::Error;

/// Input validation errors.
///
/// Raised when a raw parameter map does not satisfy a calculator's
/// input schema. Every variant names the offending field.
///
/// # Examples
/// ```
/// use lcis_core::types::ValidationError;
///
/// let err = ValidationError::MissingField { field: "efficiency".to_string() };
/// assert_eq!(format!("{}", err), "Missing required field 'efficiency'");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is absent.
    #[error("Missing required field '{field}'")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// The value has the wrong kind (e.g. text where a number is expected).
    #[error("Field '{field}' expects {expected}, got {found}")]
    WrongKind {
        /// Name of the field
        field: String,
        /// Expected value kind
        expected: &'static str,
        /// Kind actually supplied
        found: &'static str,
    },

    /// A numeric value is NaN or infinite.
    #[error("Field '{field}' is not finite: {value}")]
    NonFinite {
        /// Name of the field
        field: String,
        /// The offending value
        value: f64,
    },

    /// A numeric value lies outside the declared domain.
    #[error("Field '{field}' = {value} violates constraint {constraint}")]
    OutOfDomain {
        /// Name of the field
        field: String,
        /// The offending value
        value: f64,
        /// Human-readable constraint description
        constraint: String,
    },

    /// A categorical value is not one of the declared choices.
    #[error("Field '{field}' has unknown value '{value}' (allowed: {allowed})")]
    UnknownChoice {
        /// Name of the field
        field: String,
        /// The offending value
        value: String,
        /// Comma-separated allowed values
        allowed: String,
    },

    /// A series or label list is empty.
    #[error("Field '{field}' must not be empty")]
    EmptySeries {
        /// Name of the field
        field: String,
    },

    /// A field not declared by the schema was supplied.
    #[error("Unknown field '{field}' for calculator '{calculator}'")]
    UnknownField {
        /// Name of the undeclared field
        field: String,
        /// Calculator whose schema was applied
        calculator: String,
    },

    /// A parameter set validated for one calculator was handed to another.
    #[error("Parameter set was validated for '{found}', not '{expected}'")]
    SchemaMismatch {
        /// Calculator that received the parameter set
        expected: String,
        /// Calculator the parameter set was validated for
        found: String,
    },
}

/// Numeric computation errors.
///
/// # Examples
/// ```
/// use lcis_core::types::ComputationError;
///
/// let err = ComputationError::NonFinite { name: "soh_factor".to_string(), value: f64::NAN };
/// assert!(format!("{}", err).contains("soh_factor"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    /// A factor, component or result is NaN or infinite.
    #[error("Non-finite value for '{name}': {value}")]
    NonFinite {
        /// Name of the factor or component
        name: String,
        /// The offending value
        value: f64,
    },

    /// Two components of one record share a name.
    #[error("Duplicate component '{name}'")]
    DuplicateComponent {
        /// The duplicated name
        name: String,
    },

    /// The combination references a factor that was never recorded.
    #[error("Combination references missing factor '{name}'")]
    MissingFactor {
        /// Name of the missing factor
        name: String,
    },

    /// A confidence value outside [0, 1].
    #[error("Confidence must lie in [0, 1], got {value}")]
    InvalidConfidence {
        /// The offending value
        value: f64,
    },
}

/// Formula-specific precondition violations.
///
/// # Examples
/// ```
/// use lcis_core::types::DomainError;
///
/// let err = DomainError::NonPositiveDivisor { name: "time_penalty".to_string(), value: 0.0 };
/// assert_eq!(format!("{}", err), "Divisor 'time_penalty' must be positive, got 0");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A divisor is zero or negative.
    #[error("Divisor '{name}' must be positive, got {value}")]
    NonPositiveDivisor {
        /// Name of the divisor
        name: String,
        /// The offending value
        value: f64,
    },

    /// A factor required to be in (0, 1] came out non-positive.
    #[error("Factor '{name}' must be positive, got {value}")]
    NonPositiveFactor {
        /// Name of the factor
        name: String,
        /// The offending value
        value: f64,
    },

    /// A clamping band whose lower edge exceeds its upper edge.
    #[error("Invalid band: min {min} exceeds max {max}")]
    InvalidBand {
        /// Lower edge
        min: f64,
        /// Upper edge
        max: f64,
    },

    /// Parallel series of different lengths.
    #[error("Series '{field}' has length {found}, expected {expected}")]
    LengthMismatch {
        /// Name of the mismatched series
        field: String,
        /// Length of the reference series
        expected: usize,
        /// Length actually supplied
        found: usize,
    },

    /// A total used as a normaliser is zero.
    #[error("Total '{name}' must be positive")]
    ZeroTotal {
        /// Name of the total
        name: String,
    },

    /// A grid step outside (0, 1].
    #[error("Grid step must lie in (0, 1], got {step}")]
    InvalidStep {
        /// The offending step
        step: f64,
    },

    /// A grid step so small the scan would exceed its point limit.
    #[error("Grid step {step} needs more than {max_points} points")]
    GridTooFine {
        /// The offending step
        step: f64,
        /// Largest grid the scan will build
        max_points: usize,
    },
}

/// Any error a calculator call can surface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A non-finite value was produced.
    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),

    /// A formula precondition was violated.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl EvaluationError {
    /// Short category name used in reports ("validation", "computation", "domain").
    pub fn category(&self) -> &'static str {
        match self {
            EvaluationError::Validation(_) => "validation",
            EvaluationError::Computation(_) => "computation",
            EvaluationError::Domain(_) => "domain",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = ValidationError::MissingField {
            field: "clean_ratio".to_string(),
        };
        assert_eq!(format!("{}", err), "Missing required field 'clean_ratio'");
    }

    #[test]
    fn test_out_of_domain_display() {
        let err = ValidationError::OutOfDomain {
            field: "efficiency".to_string(),
            value: 1.5,
            constraint: "[0, 1]".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Field 'efficiency' = 1.5 violates constraint [0, 1]"
        );
    }

    #[test]
    fn test_invalid_band_display() {
        let err = DomainError::InvalidBand { min: 0.8, max: 0.3 };
        assert_eq!(format!("{}", err), "Invalid band: min 0.8 exceeds max 0.3");
    }

    #[test]
    fn test_evaluation_error_from_variants() {
        let v: EvaluationError = ValidationError::EmptySeries {
            field: "weights".to_string(),
        }
        .into();
        assert_eq!(v.category(), "validation");

        let c: EvaluationError = ComputationError::NonFinite {
            name: "rate".to_string(),
            value: f64::INFINITY,
        }
        .into();
        assert_eq!(c.category(), "computation");

        let d: EvaluationError = DomainError::ZeroTotal {
            name: "capacity".to_string(),
        }
        .into();
        assert_eq!(d.category(), "domain");
        assert!(d.to_string().starts_with("Domain error"));
    }

    #[test]
    fn test_error_is_error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(DomainError::InvalidStep { step: 0.0 });
        assert!(err.to_string().contains("(0, 1]"));
    }

    #[test]
    fn test_grid_too_fine_display() {
        let err = DomainError::GridTooFine {
            step: 1e-7,
            max_points: 1_000_001,
        };
        assert_eq!(err.to_string(), "Grid step 0.0000001 needs more than 1000001 points");
    }
}
