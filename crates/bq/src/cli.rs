//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the bq CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::record::FieldSpec;

/// bq - Filter JSON Lines records with boolean expressions
#[derive(Parser, Debug)]
#[command(name = "bq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the records that match an expression
    #[command(alias = "f")]
    Filter {
        /// Filter expression (e.g., "age gt 20 and name John")
        expression: String,

        /// JSON Lines input (default: stdin)
        file: Option<PathBuf>,

        /// Bind a field to a JSON pointer (repeatable)
        #[arg(short, long = "field", value_name = "NAME=POINTER", action = clap::ArgAction::Append)]
        fields: Vec<FieldSpec>,

        /// Print only the number of selected records
        #[arg(short, long)]
        count: bool,

        /// Select the records that do not match
        #[arg(long)]
        invert: bool,
    },

    /// Validate an expression and show its canonical form
    #[command(alias = "c")]
    Check {
        /// Filter expression
        expression: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print config file path
    Path,

    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
