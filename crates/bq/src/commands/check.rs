//! Check command implementation.
//!
//! Parses an expression without reading any records and reports its
//! canonical form and the fields it references.

use booleval::Evaluator;
use serde::Serialize;

use super::config::load_config;
use super::{CommandContext, CommandError, Result};
use crate::record::FieldSpec;

/// What `bq check` found out about an expression.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// The expression re-rendered in canonical form.
    pub canonical: String,
    /// Referenced field names, in order of first appearance.
    pub fields: Vec<String>,
    /// Number of comparisons in the expression.
    pub comparisons: usize,
    /// Referenced fields missing from the configured bindings.
    pub unbound: Vec<UnboundField>,
}

/// A referenced field with no configured binding.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UnboundField {
    /// Field name as written in the expression.
    pub field: String,
    /// Closest configured field name, if one is similar enough.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Executes the check command.
pub fn execute(ctx: &CommandContext, expression: &str) -> Result<()> {
    let config = load_config(ctx)?;
    let report = analyze(expression, &config.field_specs()?)?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    use owo_colors::OwoColorize;
    let colors = ctx.use_colors && config.color_enabled();

    if colors {
        println!("{} {}", "ok".green().bold(), report.canonical);
    } else {
        println!("ok {}", report.canonical);
    }
    println!("Fields: {}", report.fields.join(", "));
    println!("Comparisons: {}", report.comparisons);

    for unbound in &report.unbound {
        let label = if colors {
            "warning:".yellow().bold().to_string()
        } else {
            "warning:".to_string()
        };
        match &unbound.suggestion {
            Some(suggestion) => eprintln!(
                "{label} field '{}' is not configured (did you mean '{suggestion}'?)",
                unbound.field
            ),
            None => eprintln!("{label} field '{}' is not configured", unbound.field),
        }
    }

    Ok(())
}

/// Parses `expression` against the given bindings.
///
/// With no bindings every field counts as bound, since the filter command
/// then reads each field from the top-level key of the same name.
///
/// # Errors
///
/// Returns the parse error, or [`CommandError::EmptyExpression`].
pub fn analyze(expression: &str, specs: &[FieldSpec]) -> Result<CheckReport> {
    let mut evaluator = Evaluator::new(specs.iter().map(FieldSpec::binding));
    evaluator.set_expression(expression)?;
    let tree = evaluator.tree().ok_or(CommandError::EmptyExpression)?;

    let fields: Vec<String> = tree.field_names().into_iter().map(str::to_owned).collect();
    let registry = evaluator.registry();
    let unbound = if registry.is_empty() {
        Vec::new()
    } else {
        fields
            .iter()
            .filter(|field| !registry.contains(field))
            .map(|field| UnboundField {
                field: field.clone(),
                suggestion: registry.suggest(field).map(str::to_owned),
            })
            .collect()
    };

    Ok(CheckReport {
        canonical: tree.to_string(),
        fields,
        comparisons: tree.comparison_count(),
        unbound,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use booleval::ParseError;

    #[test]
    fn test_analyze_canonical_form() {
        let report = analyze("age gt 20 and (name John or name 'Mary Ann')", &[]).unwrap();
        assert_eq!(
            report.canonical,
            "age > 20 and (name == John or name == \"Mary Ann\")"
        );
        assert_eq!(report.fields, vec!["age", "name"]);
        assert_eq!(report.comparisons, 3);
        assert!(report.unbound.is_empty());
    }

    #[test]
    fn test_analyze_reports_unbound_fields() {
        let specs: Vec<FieldSpec> = vec!["name=/name".parse().unwrap()];
        let report = analyze("nmae John or zip_code x", &specs).unwrap();
        assert_eq!(
            report.unbound,
            vec![
                UnboundField {
                    field: "nmae".into(),
                    suggestion: Some("name".into()),
                },
                UnboundField {
                    field: "zip_code".into(),
                    suggestion: None,
                },
            ]
        );
    }

    #[test]
    fn test_analyze_parse_error() {
        match analyze("(a 1", &[]) {
            Err(CommandError::Expression(e)) => assert_eq!(e, ParseError::UnclosedParenthesis),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_analyze_empty() {
        assert!(matches!(analyze("", &[]), Err(CommandError::EmptyExpression)));
    }

    #[test]
    fn test_report_json_shape() {
        let report = analyze("a 1", &[]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["canonical"], "a == 1");
        assert_eq!(json["comparisons"], 1);
        assert_eq!(json["unbound"], serde_json::json!([]));
    }
}
