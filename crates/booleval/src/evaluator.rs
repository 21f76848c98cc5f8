//! The evaluator facade: install an expression once, test many objects.
//!
//! # Example
//!
//! ```
//! use booleval::{make_field, Evaluator};
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! let mut evaluator = Evaluator::new([
//!     make_field("name", |p: &Person| p.name.clone()),
//!     make_field("age", |p: &Person| p.age),
//! ]);
//!
//! assert!(evaluator.expression("age gt 20 and (name John or name Jane)"));
//! assert!(evaluator.is_activated());
//!
//! let john = Person { name: "John".into(), age: 25 };
//! let jack = Person { name: "Jack".into(), age: 25 };
//! assert!(evaluator.evaluate(&john).success);
//! assert!(!evaluator.evaluate(&jack).success);
//! ```
//!
//! # Concurrency
//!
//! [`Evaluator::evaluate`] takes `&self` and never mutates state, so one
//! evaluator can serve many threads at once. [`Evaluator::expression`] takes
//! `&mut self`; share an evaluator behind a lock if the filter must change
//! while other threads evaluate.

use std::any::Any;

use tracing::{debug, trace};

use crate::ast::{Expression, LogicalOp};
use crate::compare::compare;
use crate::error::{EvalError, ParseError, ParseResult};
use crate::field::{FieldBinding, FieldRegistry};
use crate::parser::ExpressionParser;

/// Outcome of evaluating one object.
///
/// `success` is the boolean result of the filter. When evaluation could not
/// be carried out, `success` is false and `message` says why; otherwise
/// `message` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationResult {
    /// Whether the object matched.
    pub success: bool,
    /// Human-readable failure cause, empty when evaluation completed.
    pub message: String,
}

impl EvaluationResult {
    /// A completed evaluation with the given outcome.
    pub fn completed(success: bool) -> Self {
        Self {
            success,
            message: String::new(),
        }
    }

    /// An evaluation that could not be completed.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<Result<bool, EvalError>> for EvaluationResult {
    fn from(result: Result<bool, EvalError>) -> Self {
        match result {
            Ok(success) => Self::completed(success),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

/// Owns a field registry and the currently installed expression tree.
///
/// The evaluator is deactivated until a non-empty expression parses
/// successfully. A failed [`expression`](Self::expression) call discards any
/// previously installed tree.
#[derive(Debug, Default)]
pub struct Evaluator {
    registry: FieldRegistry,
    tree: Option<Expression>,
    last_error: Option<ParseError>,
}

impl Evaluator {
    /// Creates an evaluator with the given field bindings.
    pub fn new(bindings: impl IntoIterator<Item = FieldBinding>) -> Self {
        Self::with_registry(bindings.into_iter().collect())
    }

    /// Creates an evaluator around an existing registry.
    pub fn with_registry(registry: FieldRegistry) -> Self {
        Self {
            registry,
            tree: None,
            last_error: None,
        }
    }

    /// Registers another field. A binding with the same name is replaced.
    pub fn add_field(&mut self, binding: FieldBinding) {
        self.registry.register(binding);
    }

    /// Returns the field registry.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Parses `text` and installs it as the current filter.
    ///
    /// Returns whether parsing succeeded. Empty input succeeds but leaves the
    /// evaluator deactivated. On failure the previous filter is discarded
    /// and the error is available from [`last_error`](Self::last_error).
    pub fn expression(&mut self, text: &str) -> bool {
        self.set_expression(text).is_ok()
    }

    /// Like [`expression`](Self::expression), but returns the parse error.
    ///
    /// On success the value is whether the evaluator is now activated.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] for malformed input. The evaluator is left
    /// deactivated.
    pub fn set_expression(&mut self, text: &str) -> ParseResult<bool> {
        self.tree = None;

        match ExpressionParser::parse(text) {
            Ok(tree) => {
                if let Some(tree) = &tree {
                    debug!(
                        comparisons = tree.comparison_count(),
                        "installed filter expression"
                    );
                }
                self.tree = tree;
                self.last_error = None;
                Ok(self.tree.is_some())
            }
            Err(e) => {
                debug!(error = %e, "rejected filter expression");
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Returns true if a non-empty expression is installed.
    pub fn is_activated(&self) -> bool {
        self.tree.is_some()
    }

    /// Returns the installed expression tree, if any.
    pub fn tree(&self) -> Option<&Expression> {
        self.tree.as_ref()
    }

    /// Returns the error from the last rejected expression, if the most
    /// recent call failed.
    pub fn last_error(&self) -> Option<&ParseError> {
        self.last_error.as_ref()
    }

    /// Removes the installed expression and deactivates the evaluator.
    pub fn clear(&mut self) {
        self.tree = None;
        self.last_error = None;
    }

    /// Evaluates the installed expression against `object`.
    pub fn evaluate<T: Any>(&self, object: &T) -> EvaluationResult {
        self.try_evaluate(object).into()
    }

    /// Like [`evaluate`](Self::evaluate), but returns a typed error.
    ///
    /// # Errors
    ///
    /// - [`EvalError::NotActivated`] if no expression is installed.
    /// - [`EvalError::UnknownField`] if a comparison that had to be evaluated
    ///   names an unregistered field. This aborts the whole evaluation.
    /// - [`EvalError::IncompatibleObject`] if `object` is not the type a
    ///   field was registered for.
    pub fn try_evaluate<T: Any>(&self, object: &T) -> Result<bool, EvalError> {
        let Some(tree) = &self.tree else {
            return Err(EvalError::NotActivated);
        };
        let result = self.evaluate_node(tree, object);
        trace!(?result, "evaluated object");
        result
    }

    /// Evaluates a node with short-circuiting. Right operands are walked in
    /// a loop, so long chains do not grow the stack.
    fn evaluate_node(&self, node: &Expression, object: &dyn Any) -> Result<bool, EvalError> {
        let mut node = node;
        loop {
            match node {
                Expression::Comparison { field, op, literal } => {
                    let binding = self
                        .registry
                        .lookup(field)
                        .ok_or_else(|| EvalError::unknown_field(field))?;
                    let value = binding
                        .extract(object)
                        .ok_or_else(|| EvalError::incompatible_object(field))?;
                    return Ok(compare(&value, *op, literal));
                }
                Expression::Logical { op, left, right } => {
                    let decided = self.evaluate_node(left, object)?;
                    match (op, decided) {
                        (LogicalOp::And, false) => return Ok(false),
                        (LogicalOp::Or, true) => return Ok(true),
                        _ => node = &**right,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
