//! `plumb config`: read and write configuration values.
//!
//! Keys are dotted paths into the TOML layout, e.g. `fix.backup` or
//! `versions.node.runtime`.

use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::{
    cli::ConfigCommands,
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&render_value(&value))?;
        }

        ConfigCommands::Set { key, value } => {
            let path = active_config_path(config_file);
            let existing = if path.exists() {
                std::fs::read_to_string(&path)
                    .with_cli_context(|| format!("Failed to read {}", path.display()))?
            } else {
                String::new()
            };

            let updated = set_config_value(&existing, &key, &value)?;

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_cli_context(|| {
                    format!("Failed to create config directory '{}'", parent.display())
                })?;
            }
            std::fs::write(&path, updated)
                .with_cli_context(|| format!("Failed to write {}", path.display()))?;

            output.success(&format!("{key} = {value} ({})", path.display()))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                output.header("Current Configuration:")?;
                let serialised = config
                    .to_toml()
                    .map_err(|e| CliError::config("Failed to serialise config", e))?;
                output.print(&serialised)?;
            }
        }

        ConfigCommands::Path => {
            output.print(&active_config_path(config_file).display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// `--config`, else `.plumb.toml` when present, else the user config file.
fn active_config_path(config_file: Option<PathBuf>) -> PathBuf {
    config_file.unwrap_or_else(|| {
        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.exists() {
            local.to_path_buf()
        } else {
            AppConfig::config_path()
        }
    })
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<Value> {
    let root = Value::try_from(config)
        .map_err(|e| CliError::config("Failed to serialise config", e))?;
    lookup(&root, key)
        .cloned()
        .ok_or_else(|| unknown_key(key))
}

/// Apply `key = raw` to the TOML document `existing` and return the new text.
///
/// The result must still deserialise into [`AppConfig`] and keep the key,
/// which rejects typos and values of the wrong type.
fn set_config_value(existing: &str, key: &str, raw: &str) -> CliResult<String> {
    let mut table: Table = existing
        .parse()
        .map_err(|e| CliError::config("Existing configuration file is not valid TOML", anyhow::Error::new(e)))?;

    let defaults = Value::try_from(AppConfig::default())
        .map_err(|e| CliError::config("Failed to serialise config", e))?;
    let as_list = matches!(lookup(&defaults, key), Some(Value::Array(_)));

    insert(&mut table, key, parse_value(raw, as_list))?;

    let text = toml::to_string_pretty(&table)
        .map_err(|e| CliError::config("Failed to serialise config", e))?;
    let parsed: AppConfig = toml::from_str(&text).map_err(|e| {
        CliError::config(format!("Invalid value for '{key}'"), anyhow::Error::new(e))
    })?;

    let check = Value::try_from(&parsed)
        .map_err(|e| CliError::config("Failed to serialise config", e))?;
    if lookup(&check, key).is_none() {
        return Err(unknown_key(key));
    }

    Ok(text)
}

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

fn insert(table: &mut Table, key: &str, value: Value) -> CliResult<()> {
    let mut parts: Vec<&str> = key.split('.').collect();
    let Some(last) = parts.pop().filter(|p| !p.is_empty()) else {
        return Err(unknown_key(key));
    };

    let mut current = table;
    for part in parts {
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        current = entry.as_table_mut().ok_or_else(|| unknown_key(key))?;
    }
    current.insert(last.to_string(), value);
    Ok(())
}

fn parse_value(raw: &str, as_list: bool) -> Value {
    if as_list {
        return Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        );
    }
    if let Ok(b) = raw.parse::<bool>() {
        return Value::Boolean(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Integer(i);
    }
    Value::String(raw.to_string())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Table(_) => toml::to_string_pretty(value).unwrap_or_default(),
        other => other.to_string(),
    }
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
