//! Boolean filter expressions evaluated against caller-defined objects.
//!
//! Callers register named fields bound to accessors on their own types, set
//! a filter expression once, then test any number of objects against it.
//!
//! # Supported Syntax
//!
//! ## Comparisons
//! - `field value` - implicit equality
//! - `field eq value`, `field == value`
//! - `neq` / `!=`, `gt` / `>`, `geq` / `>=`, `lt` / `<`, `leq` / `<=`
//!
//! ## Literals
//! - bare words: `John`, `25`, `1.23`
//! - quoted strings: `"John Smith"`, `'John Smith'`, `''`
//!
//! ## Boolean Operators
//! - `and` / `&&` - binds tighter than `or`
//! - `or` / `||`
//! - `()` - grouping
//!
//! # Example
//!
//! ```
//! use booleval::{make_field, Evaluator};
//!
//! struct Point {
//!     x: i32,
//!     label: String,
//! }
//!
//! let mut evaluator = Evaluator::default();
//! evaluator.add_field(make_field("x", |p: &Point| p.x));
//! evaluator.add_field(make_field("label", |p: &Point| p.label.clone()));
//!
//! assert!(evaluator.expression("x >= -3 && label != 'origin'"));
//!
//! let p = Point { x: 1, label: "a".into() };
//! assert!(evaluator.evaluate(&p).success);
//! ```

mod ast;
mod compare;
mod error;
mod evaluator;
mod field;
mod lexer;
mod parser;

pub use ast::{ComparisonOp, Expression, LogicalOp};
pub use compare::compare;
pub use error::{EvalError, ParseError, ParseResult};
pub use evaluator::{EvaluationResult, Evaluator};
pub use field::{make_field, FieldBinding, FieldRegistry, FieldValue};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::{ExpressionParser, MAX_NESTING_DEPTH};

#[cfg(test)]
mod tests;
