//! Command implementations for the bq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod completions;
pub mod config;
pub mod filter;

use std::path::PathBuf;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The expression did not parse.
    #[error("expression error: {0}")]
    Expression(#[from] booleval::ParseError),

    /// The expression parsed but contains no comparisons.
    #[error("expression is empty")]
    EmptyExpression,

    /// A record could not be evaluated.
    #[error("line {line}: {source}")]
    Evaluation {
        /// 1-based input line.
        line: usize,
        /// Underlying evaluation error.
        source: booleval::EvalError,
    },

    /// A line of input is not valid JSON.
    #[error("line {line}: invalid JSON record: {source}")]
    Record {
        /// 1-based input line.
        line: usize,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Config file given with `--config`.
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            config_path: cli.config.clone(),
        }
    }
}
