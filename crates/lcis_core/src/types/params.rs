//! Raw and validated calculator inputs.
//!
//! `RawParameters` is what callers hand in: an ordered map of names to
//! values with no guarantees. `ParameterSet` is what a calculator receives
//! after schema validation: every declared field present and in-domain,
//! with defaulted fields recorded explicitly.

use std::collections::{BTreeMap, BTreeSet};

use super::error::ValidationError;

/// A single input value.
///
/// With the `serde` feature the representation is untagged, so a TOML/JSON
/// number, string, number array or string array maps directly onto the
/// matching variant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum ParamValue {
    /// Scalar numeric input
    Number(f64),
    /// Categorical input
    Text(String),
    /// Per-asset numeric series
    Series(Vec<f64>),
    /// Per-asset labels
    Labels(Vec<String>),
}

impl ParamValue {
    /// Name of the value kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParamValue::Number(_) => "number",
            ParamValue::Text(_) => "text",
            ParamValue::Series(_) => "series",
            ParamValue::Labels(_) => "labels",
        }
    }

    /// Returns the number if this is a `Number`.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text if this is a `Text`.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the series if this is a `Series`.
    #[inline]
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            ParamValue::Series(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the labels if this is a `Labels`.
    #[inline]
    pub fn as_labels(&self) -> Option<&[String]> {
        match self {
            ParamValue::Labels(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Number(f64::from(v))
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(v: Vec<f64>) -> Self {
        ParamValue::Series(v)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        ParamValue::Labels(v)
    }
}

/// Unvalidated input map.
///
/// # Examples
/// ```
/// use lcis_core::types::RawParameters;
///
/// let shared = RawParameters::new().with("base_credit_rate", 0.1).with("efficiency", 0.92);
/// let step = RawParameters::new().with("efficiency", 0.95);
///
/// let merged = step.layered_over(&shared);
/// assert_eq!(merged.get("efficiency").and_then(|v| v.as_number()), Some(0.95));
/// assert_eq!(merged.get("base_credit_rate").and_then(|v| v.as_number()), Some(0.1));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RawParameters {
    values: BTreeMap<String, ParamValue>,
}

impl RawParameters {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Removes a value, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.values.remove(name)
    }

    /// Looks up a value.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Whether a value is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a new map with `self` on top of `base`: entries of `self`
    /// win, entries only in `base` are kept.
    pub fn layered_over(&self, base: &RawParameters) -> RawParameters {
        let mut values = base.values.clone();
        for (k, v) in &self.values {
            values.insert(k.clone(), v.clone());
        }
        RawParameters { values }
    }
}

impl FromIterator<(String, ParamValue)> for RawParameters {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Validated, immutable calculator input.
///
/// Only produced by [`crate::schema::InputSchema::validate`], so every
/// declared field is present (or explicitly optional) and in-domain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParameterSet {
    calculator: String,
    values: BTreeMap<String, ParamValue>,
    defaulted: BTreeSet<String>,
}

impl ParameterSet {
    pub(crate) fn new(
        calculator: impl Into<String>,
        values: BTreeMap<String, ParamValue>,
        defaulted: BTreeSet<String>,
    ) -> Self {
        Self {
            calculator: calculator.into(),
            values,
            defaulted,
        }
    }

    /// Calculator this set was validated for.
    pub fn calculator(&self) -> &str {
        &self.calculator
    }

    /// Fails with `SchemaMismatch` unless this set was validated for `metric`.
    pub fn ensure_for(&self, metric: &str) -> Result<(), ValidationError> {
        if self.calculator == metric {
            Ok(())
        } else {
            Err(ValidationError::SchemaMismatch {
                expected: metric.to_string(),
                found: self.calculator.clone(),
            })
        }
    }

    /// Raw access to a value.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Required numeric value.
    pub fn number(&self, name: &str) -> Result<f64, ValidationError> {
        self.optional_number(name)?
            .ok_or_else(|| missing(name))
    }

    /// Numeric value that may be absent.
    pub fn optional_number(&self, name: &str) -> Result<Option<f64>, ValidationError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(v) => v
                .as_number()
                .map(Some)
                .ok_or_else(|| wrong_kind(name, "number", v)),
        }
    }

    /// Required categorical value.
    pub fn text(&self, name: &str) -> Result<&str, ValidationError> {
        match self.values.get(name) {
            None => Err(missing(name)),
            Some(v) => v.as_text().ok_or_else(|| wrong_kind(name, "text", v)),
        }
    }

    /// Required numeric series.
    pub fn series(&self, name: &str) -> Result<&[f64], ValidationError> {
        self.optional_series(name)?.ok_or_else(|| missing(name))
    }

    /// Numeric series that may be absent.
    pub fn optional_series(&self, name: &str) -> Result<Option<&[f64]>, ValidationError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(v) => v
                .as_series()
                .map(Some)
                .ok_or_else(|| wrong_kind(name, "series", v)),
        }
    }

    /// Label list that may be absent.
    pub fn optional_labels(&self, name: &str) -> Result<Option<&[String]>, ValidationError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(v) => v
                .as_labels()
                .map(Some)
                .ok_or_else(|| wrong_kind(name, "labels", v)),
        }
    }

    /// Whether `name` was filled from its declared default.
    pub fn is_defaulted(&self, name: &str) -> bool {
        self.defaulted.contains(name)
    }

    /// Names of all defaulted fields.
    pub fn defaulted(&self) -> impl Iterator<Item = &str> {
        self.defaulted.iter().map(String::as_str)
    }

    /// Iterates all values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn missing(name: &str) -> ValidationError {
    ValidationError::MissingField {
        field: name.to_string(),
    }
}

fn wrong_kind(name: &str, expected: &'static str, found: &ParamValue) -> ValidationError {
    ValidationError::WrongKind {
        field: name.to_string(),
        expected,
        found: found.kind_name(),
    }
}
