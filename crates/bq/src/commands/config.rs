//! Config command implementation.
//!
//! View and scaffold configuration settings.
//! Config file is located at ~/.config/bq/config.toml.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};
use crate::record::FieldSpec;

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "BQ_CONFIG";

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# bq - JSON Lines filter configuration

# Config schema version (do not modify)
version = 1

# Field bindings: name used in expressions -> JSON pointer into each record.
# When no fields are configured, every field in an expression is read from
# the top-level key of the same name.
[fields]
# age = "/person/age"
# name = "/person/name"

# Output preferences
[output]
# color = true              # Enable colors (respects NO_COLOR env)
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Field name to JSON pointer.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            fields: BTreeMap::new(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Returns the configured fields as validated specs.
    ///
    /// # Errors
    ///
    /// Returns a config error naming the first invalid pointer.
    pub fn field_specs(&self) -> Result<Vec<FieldSpec>> {
        self.fields
            .iter()
            .map(|(name, pointer)| {
                FieldSpec::new(name.as_str(), pointer.as_str()).map_err(CommandError::Config)
            })
            .collect()
    }

    /// Whether colored output is allowed by the config file.
    pub fn color_enabled(&self) -> bool {
        self.output.color.unwrap_or(true)
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/bq/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("bq"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("bq"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
///
/// Priority: `--config` flag, then the `BQ_CONFIG` env var, then the default
/// location.
pub fn get_config_path(ctx: &CommandContext) -> Result<PathBuf> {
    if let Some(path) = &ctx.config_path {
        return Ok(path.clone());
    }

    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config(ctx: &CommandContext) -> Result<Config> {
    let path = get_config_path(ctx)?;
    load_config_from(&path)
}

/// Loads the configuration from a specific file. A missing file yields the
/// default configuration.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than supported version {}",
            config.version, CONFIG_VERSION
        )));
    }

    tracing::debug!(path = %path.display(), fields = config.fields.len(), "loaded config");
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config(ctx)?;
    let path = get_config_path(ctx)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors && config.color_enabled() {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("[fields]");
            if config.fields.is_empty() {
                println!("  (none: fields are read from top-level keys)");
            }
            for (name, pointer) in &config.fields {
                println!("  {}: {}", name, pointer);
            }

            println!("\n[output]");
            if let Some(color) = config.output.color {
                println!("  color: {}", color);
            }
        } else {
            println!("(No config file exists. Run 'bq config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path(ctx)?;
    write_default_config(&path, force)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created {}", path.display());
    }

    Ok(())
}

/// Writes the commented default config to `path`.
fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}
