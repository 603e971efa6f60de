//! Input schemas and parameter validation.
//!
//! Each calculator declares an `InputSchema`: an ordered list of fields with
//! a value domain and a requirement. Validation turns a `RawParameters` map
//! into a `ParameterSet` or names the field and constraint that failed.
//!
//! Nothing is clamped during validation. A value outside its domain is an
//! error; only fields declared `Defaulted` are filled in, and those are
//! recorded on the resulting `ParameterSet`.

mod domain;

pub use domain::Domain;

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{ParamValue, ParameterSet, RawParameters, ValidationError};

/// How a field may be supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    /// Must be present
    Required,
    /// May be absent, no default
    Optional,
    /// Filled with this value when absent
    Defaulted(ParamValue),
}

impl Requirement {
    /// Short description for listings.
    pub fn describe(&self) -> String {
        match self {
            Requirement::Required => "required".to_string(),
            Requirement::Optional => "optional".to_string(),
            Requirement::Defaulted(ParamValue::Number(v)) => format!("default {}", v),
            Requirement::Defaulted(ParamValue::Text(s)) => format!("default '{}'", s),
            Requirement::Defaulted(other) => format!("default <{}>", other.kind_name()),
        }
    }
}

/// Declaration of one input field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name
    pub name: &'static str,
    /// Accepted values
    pub domain: Domain,
    /// Whether the field must be supplied
    pub requirement: Requirement,
    /// One-line description
    pub description: &'static str,
}

impl FieldSpec {
    /// A field that must be supplied.
    pub fn required(name: &'static str, domain: Domain, description: &'static str) -> Self {
        Self {
            name,
            domain,
            requirement: Requirement::Required,
            description,
        }
    }

    /// A field that may be absent.
    pub fn optional(name: &'static str, domain: Domain, description: &'static str) -> Self {
        Self {
            name,
            domain,
            requirement: Requirement::Optional,
            description,
        }
    }

    /// A field filled with `default` when absent.
    pub fn defaulted(
        name: &'static str,
        domain: Domain,
        default: impl Into<ParamValue>,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            domain,
            requirement: Requirement::Defaulted(default.into()),
            description,
        }
    }
}

/// Ordered input contract of one calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSchema {
    calculator: &'static str,
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    /// Creates an empty schema for `calculator`.
    pub fn new(calculator: &'static str) -> Self {
        Self {
            calculator,
            fields: Vec::new(),
        }
    }

    /// Appends a field declaration.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Calculator this schema belongs to.
    pub fn calculator(&self) -> &'static str {
        self.calculator
    }

    /// Declared fields in order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field declaration.
    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates `raw`, failing on the first violation.
    ///
    /// Declared fields are checked in declaration order, then undeclared
    /// fields in name order.
    pub fn validate(&self, raw: &RawParameters) -> Result<ParameterSet, ValidationError> {
        self.check_all(raw)
            .map_err(|mut errors| errors.swap_remove(0))
    }

    /// Validates `raw`, collecting every violation.
    ///
    /// # Returns
    /// The validated set, or a non-empty list of errors in the same order
    /// `validate` would encounter them.
    pub fn check_all(&self, raw: &RawParameters) -> Result<ParameterSet, Vec<ValidationError>> {
        let mut values = BTreeMap::new();
        let mut defaulted = BTreeSet::new();
        let mut errors = Vec::new();

        for spec in &self.fields {
            let (value, is_default) = match (raw.get(spec.name), &spec.requirement) {
                (Some(v), _) => (v, false),
                (None, Requirement::Defaulted(d)) => (d, true),
                (None, Requirement::Optional) => continue,
                (None, Requirement::Required) => {
                    errors.push(ValidationError::MissingField {
                        field: spec.name.to_string(),
                    });
                    continue;
                }
            };

            match spec.domain.check(spec.name, value) {
                Ok(()) => {
                    values.insert(spec.name.to_string(), value.clone());
                    if is_default {
                        defaulted.insert(spec.name.to_string());
                    }
                }
                Err(e) => errors.push(e),
            }
        }

        for (name, _) in raw.iter() {
            if self.field_spec(name).is_none() {
                errors.push(ValidationError::UnknownField {
                    field: name.to_string(),
                    calculator: self.calculator.to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(ParameterSet::new(self.calculator, values, defaulted))
        } else {
            Err(errors)
        }
    }
}
