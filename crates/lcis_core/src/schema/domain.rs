//! Value domains for calculator inputs.

use crate::types::{ParamValue, ValidationError};

/// The set of values a field accepts.
///
/// Numeric domains reject NaN and infinities before checking their bounds.
///
/// # Examples
/// ```
/// use lcis_core::schema::Domain;
/// use lcis_core::types::ParamValue;
///
/// assert!(Domain::UnitInterval.check("ratio", &ParamValue::Number(0.3)).is_ok());
/// assert!(Domain::UnitInterval.check("ratio", &ParamValue::Number(1.3)).is_err());
/// assert_eq!(Domain::PositiveUnit.describe(), "(0, 1]");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    /// Any finite number
    Real,
    /// Finite and >= 0
    NonNegative,
    /// Finite and > 0
    Positive,
    /// [0, 1]
    UnitInterval,
    /// (0, 1]
    PositiveUnit,
    /// [min, max]
    Closed {
        /// Lower edge
        min: f64,
        /// Upper edge
        max: f64,
    },
    /// Whole number >= min
    Count {
        /// Smallest allowed count
        min: u32,
    },
    /// One of a fixed set of categorical values
    OneOf(&'static [&'static str]),
    /// Non-empty numeric series whose elements satisfy the inner domain
    Series(Box<Domain>),
    /// Non-empty list of labels
    Labels,
}

impl Domain {
    /// Convenience constructor for a series domain.
    pub fn series_of(element: Domain) -> Self {
        Domain::Series(Box::new(element))
    }

    /// Human-readable constraint, as used in `OutOfDomain` errors.
    pub fn describe(&self) -> String {
        match self {
            Domain::Real => "finite".to_string(),
            Domain::NonNegative => ">= 0".to_string(),
            Domain::Positive => "> 0".to_string(),
            Domain::UnitInterval => "[0, 1]".to_string(),
            Domain::PositiveUnit => "(0, 1]".to_string(),
            Domain::Closed { min, max } => format!("[{}, {}]", min, max),
            Domain::Count { min } => format!("whole number >= {}", min),
            Domain::OneOf(choices) => format!("one of {}", choices.join(", ")),
            Domain::Series(element) => format!("non-empty series of {}", element.describe()),
            Domain::Labels => "non-empty labels".to_string(),
        }
    }

    /// Kind of `ParamValue` this domain expects.
    pub fn expected_kind(&self) -> &'static str {
        match self {
            Domain::OneOf(_) => "text",
            Domain::Series(_) => "series",
            Domain::Labels => "labels",
            _ => "number",
        }
    }

    /// Checks one value against the domain.
    pub fn check(&self, field: &str, value: &ParamValue) -> Result<(), ValidationError> {
        match (self, value) {
            (Domain::OneOf(choices), ParamValue::Text(s)) => {
                if choices.contains(&s.as_str()) {
                    Ok(())
                } else {
                    Err(ValidationError::UnknownChoice {
                        field: field.to_string(),
                        value: s.clone(),
                        allowed: choices.join(", "),
                    })
                }
            }
            (Domain::Series(element), ParamValue::Series(values)) => {
                if values.is_empty() {
                    return Err(ValidationError::EmptySeries {
                        field: field.to_string(),
                    });
                }
                for (i, v) in values.iter().enumerate() {
                    element.check_number(&format!("{}[{}]", field, i), *v)?;
                }
                Ok(())
            }
            (Domain::Labels, ParamValue::Labels(labels)) => {
                if labels.is_empty() {
                    Err(ValidationError::EmptySeries {
                        field: field.to_string(),
                    })
                } else {
                    Ok(())
                }
            }
            (Domain::OneOf(_) | Domain::Series(_) | Domain::Labels, other) => {
                Err(self.wrong_kind(field, other))
            }
            (_, ParamValue::Number(x)) => self.check_number(field, *x),
            (_, other) => Err(self.wrong_kind(field, other)),
        }
    }

    /// Checks a scalar against a numeric domain.
    pub fn check_number(&self, field: &str, x: f64) -> Result<(), ValidationError> {
        if !x.is_finite() {
            return Err(ValidationError::NonFinite {
                field: field.to_string(),
                value: x,
            });
        }

        let ok = match self {
            Domain::Real => true,
            Domain::NonNegative => x >= 0.0,
            Domain::Positive => x > 0.0,
            Domain::UnitInterval => (0.0..=1.0).contains(&x),
            Domain::PositiveUnit => x > 0.0 && x <= 1.0,
            Domain::Closed { min, max } => x >= *min && x <= *max,
            Domain::Count { min } => x.fract() == 0.0 && x >= f64::from(*min),
            Domain::OneOf(_) | Domain::Series(_) | Domain::Labels => {
                return Err(ValidationError::WrongKind {
                    field: field.to_string(),
                    expected: self.expected_kind(),
                    found: "number",
                });
            }
        };

        if ok {
            Ok(())
        } else {
            Err(ValidationError::OutOfDomain {
                field: field.to_string(),
                value: x,
                constraint: self.describe(),
            })
        }
    }

    fn wrong_kind(&self, field: &str, found: &ParamValue) -> ValidationError {
        ValidationError::WrongKind {
            field: field.to_string(),
            expected: self.expected_kind(),
            found: found.kind_name(),
        }
    }
}
