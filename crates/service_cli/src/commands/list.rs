//! List command implementation
//!
//! Lists the calculators and, for one calculator, its input schema.


use lcis_core::schema::FieldSpec;
use lcis_core::traits::Calculator;
use lcis_models::calculators::CalculatorKind;
use serde::Serialize;

use crate::output::{push_line, to_json, OutputFormat};
use crate::{CliError, Result};

#[derive(Debug, Serialize)]
struct FieldListing {
    name: &'static str,
    domain: String,
    requirement: String,
    description: &'static str,
}

impl From<&FieldSpec> for FieldListing {
    fn from(spec: &FieldSpec) -> Self {
        Self {
            name: spec.name,
            domain: spec.domain.describe(),
            requirement: spec.requirement.describe(),
            description: spec.description,
        }
    }
}

#[derive(Debug, Serialize)]
struct CalculatorListing {
    name: &'static str,
    fields: Vec<FieldListing>,
}

fn listing(kind: CalculatorKind) -> CalculatorListing {
    let schema = kind.schema();
    CalculatorListing {
        name: kind.name(),
        fields: schema.fields().iter().map(FieldListing::from).collect(),
    }
}

/// Build the listing for every calculator, or only `calculator`.
pub fn render(calculator: Option<&str>, format: OutputFormat) -> Result<String> {
    let kinds = match calculator {
        Some(name) => vec![CalculatorKind::from_name(name)
            .ok_or_else(|| CliError::UnknownCalculator(name.to_string()))?],
        None => CalculatorKind::all().to_vec(),
    };
    let listings: Vec<_> = kinds.into_iter().map(listing).collect();

    if format == OutputFormat::Json {
        return to_json(&listings);
    }

    let mut out = String::new();
    for entry in &listings {
        push_line(&mut out, entry.name);
        for field in &entry.fields {
            push_line(
                &mut out,
                format!(
                    "  {:<28} {:<28} {:<16} {}",
                    field.name, field.domain, field.requirement, field.description
                ),
            );
        }
    }
    Ok(out)
}

/// Run the list command
pub fn run(calculator: Option<&str>, format: OutputFormat) -> Result<()> {
    print!("{}", render(calculator, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_calculator() {
        let text = render(None, OutputFormat::Table).unwrap();
        for kind in CalculatorKind::all() {
            assert!(text.contains(kind.name()), "missing {}", kind);
        }
    }

    #[test]
    fn test_single_calculator_json() {
        let json = render(Some("carbon_credit"), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["name"], "carbon_credit");
        let fields = value[0]["fields"].as_array().unwrap();
        assert!(fields.iter().any(|f| f["name"] == "energy_delivered"));
    }

    #[test]
    fn test_unknown_calculator() {
        assert!(matches!(
            render(Some("nope"), OutputFormat::Table),
            Err(CliError::UnknownCalculator(_))
        ));
    }
}
