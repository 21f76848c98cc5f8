//! Comparison of an extracted field value against a literal.
//!
//! Numeric values are compared numerically when the literal parses in the
//! value's own numeric family; otherwise both sides are compared as text.
//! Text values are always compared as text, even when they look like numbers.

use std::fmt::Display;
use std::str::FromStr;

use crate::ast::ComparisonOp;
use crate::field::FieldValue;

/// Compares `value` against `literal` using `op`.
///
/// # Example
///
/// ```
/// use booleval::{compare, ComparisonOp, FieldValue};
///
/// // Numeric field: numeric comparison.
/// assert!(compare(&FieldValue::F32(1.24), ComparisonOp::Gt, "1.23"));
///
/// // Text field: lexicographic, so "1000" sorts before "200".
/// assert!(!compare(&FieldValue::Text("1000".into()), ComparisonOp::Gt, "200"));
/// ```
pub fn compare(value: &FieldValue, op: ComparisonOp, literal: &str) -> bool {
    match value {
        FieldValue::Text(text) => op.apply(text.as_str(), literal),
        FieldValue::Int(number) => compare_number(*number, op, literal),
        FieldValue::UInt(number) => compare_number(*number, op, literal),
        FieldValue::F32(number) => compare_number(*number, op, literal),
        FieldValue::F64(number) => compare_number(*number, op, literal),
    }
}

/// Parses the literal as `T` and compares numerically, falling back to the
/// textual form of `number` when the literal is not a `T`.
fn compare_number<T>(number: T, op: ComparisonOp, literal: &str) -> bool
where
    T: FromStr + PartialOrd + Display,
{
    match literal.parse::<T>() {
        Ok(parsed) => op.apply(&number, &parsed),
        Err(_) => op.apply(number.to_string().as_str(), literal),
    }
}
