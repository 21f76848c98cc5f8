//! Filter command implementation.
//!
//! Reads JSON Lines records and prints those selected by an expression.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use booleval::Evaluator;
use serde_json::Value;
use tracing::{debug, warn};

use super::config::load_config;
use super::{CommandContext, CommandError, Result};
use crate::record::FieldSpec;

/// Options for the filter command.
pub struct FilterOptions {
    /// Filter expression.
    pub expression: String,
    /// Input file; stdin when absent.
    pub file: Option<PathBuf>,
    /// Bindings from the command line, applied after the config file.
    pub fields: Vec<FieldSpec>,
    /// Print only the number of selected records.
    pub count: bool,
    /// Select records that do not match.
    pub invert: bool,
}

/// Counts gathered while filtering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    /// Records read, excluding blank lines.
    pub records: usize,
    /// Records selected for output.
    pub selected: usize,
}

/// Executes the filter command.
pub fn execute(ctx: &CommandContext, opts: &FilterOptions) -> Result<()> {
    let config = load_config(ctx)?;
    let mut specs = config.field_specs()?;
    specs.extend(opts.fields.iter().cloned());

    let evaluator = build_evaluator(&opts.expression, &specs)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = match &opts.file {
        Some(path) => {
            let file = File::open(path)?;
            filter_records(&evaluator, BufReader::new(file), &mut out, opts)?
        }
        None => filter_records(&evaluator, io::stdin().lock(), &mut out, opts)?,
    };

    debug!(
        records = summary.records,
        selected = summary.selected,
        "filter finished"
    );

    if opts.count {
        if ctx.json_output {
            let output = serde_json::json!({
                "records": summary.records,
                "selected": summary.selected,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        } else {
            writeln!(out, "{}", summary.selected)?;
        }
    }
    out.flush()?;

    Ok(())
}

/// Installs `expression` and registers the JSON bindings it needs.
///
/// With no bindings given, every field the expression references is read
/// from the top-level key of the same name. Later specs replace earlier
/// ones with the same name.
///
/// # Errors
///
/// Returns [`CommandError::Expression`] for a malformed expression and
/// [`CommandError::EmptyExpression`] when there is nothing to evaluate.
pub fn build_evaluator(expression: &str, specs: &[FieldSpec]) -> Result<Evaluator> {
    let mut evaluator = Evaluator::default();
    evaluator.set_expression(expression)?;

    let referenced: Vec<String> = match evaluator.tree() {
        Some(tree) => tree.field_names().into_iter().map(str::to_owned).collect(),
        None => return Err(CommandError::EmptyExpression),
    };

    if specs.is_empty() {
        for name in &referenced {
            evaluator.add_field(FieldSpec::top_level(name).binding());
        }
    } else {
        for spec in specs {
            evaluator.add_field(spec.binding());
        }
    }

    for name in referenced.iter().filter(|n| !evaluator.registry().contains(n)) {
        match evaluator.registry().suggest(name) {
            Some(suggestion) => warn!(field = %name, %suggestion, "field is not bound"),
            None => warn!(field = %name, "field is not bound"),
        }
    }

    debug!(fields = ?evaluator.registry().names(), "bound fields");
    Ok(evaluator)
}

/// Evaluates each JSON line from `reader`, writing selected lines verbatim.
///
/// Blank lines are skipped. Nothing is written in count mode.
///
/// # Errors
///
/// Stops at the first line that is not valid JSON or that cannot be
/// evaluated, reporting its 1-based line number.
pub fn filter_records<R: BufRead, W: Write>(
    evaluator: &Evaluator,
    reader: R,
    writer: &mut W,
    opts: &FilterOptions,
) -> Result<FilterSummary> {
    let mut summary = FilterSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let record: Value = serde_json::from_str(&line).map_err(|source| {
            CommandError::Record {
                line: line_number,
                source,
            }
        })?;
        summary.records += 1;

        let matched = evaluator
            .try_evaluate(&record)
            .map_err(|source| CommandError::Evaluation {
                line: line_number,
                source,
            })?;

        if matched != opts.invert {
            summary.selected += 1;
            if !opts.count {
                writeln!(writer, "{line}")?;
            }
        }
    }

    Ok(summary)
}
