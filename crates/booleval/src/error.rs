//! Error types for expression parsing and evaluation.

use thiserror::Error;

/// A specialized Result type for expression parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur while turning expression text into a tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A token appeared where the grammar does not allow it.
    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        /// The text of the offending token.
        token: String,
        /// Byte offset of the token in the input.
        position: usize,
    },

    /// The input ended while an operand was still expected.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A comparison named a field but no literal followed it.
    #[error("missing literal after field '{field}'")]
    MissingLiteral {
        /// The field whose comparison is incomplete.
        field: String,
    },

    /// A closing parenthesis had no matching opening parenthesis.
    #[error("unmatched ')' at position {position}")]
    UnmatchedCloseParen {
        /// Byte offset of the closing parenthesis.
        position: usize,
    },

    /// The input ended inside a parenthesized group.
    #[error("unclosed parenthesis")]
    UnclosedParenthesis,

    /// A quoted literal was never closed.
    #[error("unterminated quote starting at position {position}")]
    UnterminatedQuote {
        /// Byte offset of the opening quote.
        position: usize,
    },

    /// Parentheses were nested deeper than the parser allows.
    #[error("parentheses nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The maximum supported nesting depth.
        limit: usize,
    },
}

impl ParseError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl Into<String>, position: usize) -> Self {
        ParseError::UnexpectedToken {
            token: token.into(),
            position,
        }
    }

    /// Creates a missing literal error.
    pub fn missing_literal(field: impl Into<String>) -> Self {
        ParseError::MissingLiteral {
            field: field.into(),
        }
    }
}

/// Errors that abort the evaluation of an installed expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvalError {
    /// No expression is installed.
    #[error("Evaluator is not activated")]
    NotActivated,

    /// The expression references a field that was never registered.
    #[error("Unknown field")]
    UnknownField {
        /// The unregistered field name.
        name: String,
    },

    /// The object passed in is not the type the field was registered for.
    #[error("Incompatible object type for field '{field}'")]
    IncompatibleObject {
        /// The field whose accessor rejected the object.
        field: String,
    },
}

impl EvalError {
    /// Creates an unknown field error.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        EvalError::UnknownField { name: name.into() }
    }

    /// Creates an incompatible object error.
    pub fn incompatible_object(field: impl Into<String>) -> Self {
        EvalError::IncompatibleObject {
            field: field.into(),
        }
    }
}
