//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::logging::redaction;
use crate::output::OutputWriter;
use serde_json::Value;
use std::path::PathBuf;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
    }
}

/// Print the effective configuration with the service key masked
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let mut value = serde_json::to_value(config)?;
    redaction::redact_json_value(&mut value);

    let content = match args.format {
        ConfigFormat::Toml => {
            strip_nulls(&mut value);
            toml::to_string_pretty(&value)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?
        }
        ConfigFormat::Json => serde_json::to_string_pretty(&value)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&value)?,
    };

    output.writeln(&content)
}

/// TOML has no null; unset options are left out
fn strip_nulls(value: &mut Value) {
    if let Value::Object(map) = value {
        map.retain(|_, v| !v.is_null());
        map.values_mut().for_each(strip_nulls);
    }
}

/// Write a default configuration file
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = match (args.path, args.user) {
        (Some(path), _) => path,
        (None, true) => Config::user_config_path()
            .ok_or_else(|| Error::config("Unable to determine user config directory"))?,
        (None, false) => PathBuf::from(PROJECT_CONFIG_FILE),
    };

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(&path)?;
    output.success(&format!("✓ Created config at {}", path.display()))?;
    output.info("Set backend.base_url and backend.service_key, or export FORMFILL_BASE_URL and FORMFILL_SERVICE_KEY.")?;

    Ok(())
}
