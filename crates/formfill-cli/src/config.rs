//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - `.env` files and environment variables
//! - Command-line arguments

use crate::error::{Error, Result};
use formfill_core::http::BackendConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding `backend.base_url`
pub const BASE_URL_ENV: &str = "FORMFILL_BASE_URL";
/// Environment variable overriding `backend.service_key`
pub const SERVICE_KEY_ENV: &str = "FORMFILL_SERVICE_KEY";

/// Project config written by `formfill config init`
pub const PROJECT_CONFIG_FILE: &str = ".formfill.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection to the REST backend used by `submit`
    pub backend: BackendConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LogSettings,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Show progress spinners while waiting on the backend
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log level used when no verbosity flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { progress: true }
    }
}

/// Serialization format of a config file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Json,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(Error::config(format!(
                "Unsupported config file '{}'. Expected .yaml, .yml, .json or .toml",
                path.display()
            ))),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = FileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config = match format {
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid TOML in {}: {}", path.display(), e)))?,
        };

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations, then
    /// apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) if !path.exists() => {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                })
            }
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply `FORMFILL_BASE_URL` and `FORMFILL_SERVICE_KEY`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.backend.base_url = base_url;
        }
        if let Some(service_key) = lookup(SERVICE_KEY_ENV).filter(|v| !v.is_empty()) {
            self.backend.service_key = service_key;
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".formfill.yaml"),
            PathBuf::from(".formfill.yml"),
            PathBuf::from(".formfill.json"),
            PathBuf::from(PROJECT_CONFIG_FILE),
        ];

        if let Some(user_dir) = Self::user_config_dir() {
            paths.push(user_dir.join("config.yaml"));
            paths.push(user_dir.join("config.json"));
            paths.push(user_dir.join("config.toml"));
        }

        paths
    }

    fn user_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("formfill"))
    }

    /// Location of the user config written by `config init --user`
    pub fn user_config_path() -> Option<PathBuf> {
        Self::user_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Render in the given file format
    pub fn render(&self, path: &Path) -> Result<String> {
        match FileFormat::from_path(path)? {
            FileFormat::Yaml => Ok(serde_yaml::to_string(self)?),
            FileFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            FileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e))),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render(path)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Backend settings, failing with a hint when the connection is not set up
    pub fn backend(&self) -> Result<BackendConfig> {
        let backend = self.backend.clone();
        if backend.base_url.is_empty() {
            return Err(Error::config(format!(
                "No backend URL configured. Set backend.base_url or {}",
                BASE_URL_ENV
            )));
        }
        if backend.service_key.is_empty() {
            return Err(Error::config(format!(
                "No service key configured. Set backend.service_key or {}",
                SERVICE_KEY_ENV
            )));
        }
        Ok(backend)
    }
}
