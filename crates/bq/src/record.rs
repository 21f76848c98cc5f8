//! Field bindings over JSON records.
//!
//! Each field is a JSON pointer (RFC 6901) into a record. Values map onto
//! the comparable domains as follows: strings are text, non-negative
//! integers are unsigned, negative integers are signed, other numbers are
//! `f64`, booleans are `true`/`false` text, and null or missing values are
//! the empty string. Arrays and objects compare as their compact JSON text.

use std::fmt;
use std::str::FromStr;

use booleval::{make_field, FieldBinding, FieldValue};
use serde_json::Value;

/// A `name=/json/pointer` binding given on the command line or in config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name used in expressions.
    pub name: String,
    /// JSON pointer into each record.
    pub pointer: String,
}

impl FieldSpec {
    /// Creates a spec, validating the pointer syntax.
    pub fn new(name: impl Into<String>, pointer: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        let pointer = pointer.into();

        if name.trim().is_empty() {
            return Err("field name must not be empty".to_string());
        }
        if !pointer.starts_with('/') {
            return Err(format!(
                "invalid JSON pointer '{pointer}' for field '{name}': must start with '/'"
            ));
        }
        Ok(Self { name, pointer })
    }

    /// Binds `name` to the top-level key of the same name.
    pub fn top_level(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pointer: format!("/{}", name.replace('~', "~0").replace('/', "~1")),
        }
    }

    /// Builds the evaluator binding for this spec.
    pub fn binding(&self) -> FieldBinding {
        let pointer = self.pointer.clone();
        make_field(self.name.clone(), move |record: &Value| {
            field_value(record.pointer(&pointer))
        })
    }
}

impl FromStr for FieldSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, pointer) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=POINTER, got '{s}'"))?;
        Self::new(name.trim(), pointer.trim())
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.pointer)
    }
}

/// Converts a JSON value into a comparable field value.
pub fn field_value(value: Option<&Value>) -> FieldValue {
    match value {
        None | Some(Value::Null) => FieldValue::Text(String::new()),
        Some(Value::String(text)) => FieldValue::Text(text.clone()),
        Some(Value::Bool(flag)) => FieldValue::from(*flag),
        Some(Value::Number(number)) => {
            if let Some(unsigned) = number.as_u64() {
                FieldValue::UInt(unsigned)
            } else if let Some(signed) = number.as_i64() {
                FieldValue::Int(signed)
            } else {
                number
                    .as_f64()
                    .map_or_else(|| FieldValue::Text(number.to_string()), FieldValue::F64)
            }
        }
        Some(other) => FieldValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_spec() {
        let spec: FieldSpec = "age=/person/age".parse().unwrap();
        assert_eq!(spec.name, "age");
        assert_eq!(spec.pointer, "/person/age");
        assert_eq!(spec.to_string(), "age=/person/age");
    }

    #[test]
    fn test_parse_field_spec_errors() {
        assert!("age".parse::<FieldSpec>().is_err());
        assert!("age=person/age".parse::<FieldSpec>().is_err());
        assert!("=/age".parse::<FieldSpec>().is_err());
        assert!("age=".parse::<FieldSpec>().is_err());
    }

    #[test]
    fn test_top_level_pointer_is_escaped() {
        assert_eq!(FieldSpec::top_level("age").pointer, "/age");
        assert_eq!(FieldSpec::top_level("a/b~c").pointer, "/a~1b~0c");
    }

    #[test]
    fn test_field_value_mapping() {
        assert_eq!(field_value(Some(&json!("x"))), FieldValue::Text("x".into()));
        assert_eq!(field_value(Some(&json!(25))), FieldValue::UInt(25));
        assert_eq!(field_value(Some(&json!(-3))), FieldValue::Int(-3));
        assert_eq!(field_value(Some(&json!(1.5))), FieldValue::F64(1.5));
        assert_eq!(field_value(Some(&json!(true))), FieldValue::Text("true".into()));
        assert_eq!(field_value(Some(&json!(null))), FieldValue::Text(String::new()));
        assert_eq!(field_value(None), FieldValue::Text(String::new()));
        assert_eq!(field_value(Some(&json!([1, 2]))), FieldValue::Text("[1,2]".into()));
    }

    #[test]
    fn test_binding_follows_pointer() {
        let record = json!({"person": {"name": "John", "age": 25}});
        let age: FieldSpec = "age=/person/age".parse().unwrap();
        let missing: FieldSpec = "email=/person/email".parse().unwrap();

        assert_eq!(age.binding().extract(&record), Some(FieldValue::UInt(25)));
        assert_eq!(
            missing.binding().extract(&record),
            Some(FieldValue::Text(String::new()))
        );
        assert_eq!(age.binding().extract(&"not json"), None);
    }
}
