use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod record;

use cli::{Cli, Commands, ConfigCommands};
use commands::filter::FilterOptions;
use commands::{CommandContext, CommandError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("{error_json}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` takes precedence over the
/// verbosity flags.
fn init_tracing(cli: &Cli) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(default_log_level(cli))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn default_log_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    match &cli.command {
        Some(Commands::Filter {
            expression,
            file,
            fields,
            count,
            invert,
        }) => {
            let opts = FilterOptions {
                expression: expression.clone(),
                file: file.clone(),
                fields: fields.clone(),
                count: *count,
                invert: *invert,
            };
            commands::filter::execute(&ctx, &opts)
        }
        Some(Commands::Check { expression }) => commands::check::execute(&ctx, expression),
        Some(Commands::Config { command }) => match command {
            Some(ConfigCommands::Show) | None => commands::config::execute_show(&ctx),
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
            Some(ConfigCommands::Init { force }) => commands::config::execute_init(&ctx, *force),
        },
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
        None => {
            if !ctx.quiet {
                println!("bq - filter JSON Lines records with boolean expressions");
                println!("Use --help for usage information");
            }
            Ok(())
        }
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Expression(_) => "EXPRESSION_ERROR",
        CommandError::EmptyExpression => "EMPTY_EXPRESSION",
        CommandError::Evaluation { .. } => "EVALUATION_ERROR",
        CommandError::Record { .. } => "RECORD_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the process exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Evaluation { .. } => 1,
        CommandError::Expression(_) | CommandError::EmptyExpression => 2,
        CommandError::Io(_) => 3,
        CommandError::Record { .. } => 4,
        CommandError::Config(_) => 5,
        CommandError::Json(_) => 1,
    }
}
