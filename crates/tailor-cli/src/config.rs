//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML, TOML or JSON)
//! - Command-line arguments (applied by the handlers)

use crate::cli::RenderFormat;
use crate::error::{Error, Result};
use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tailor_core::XmlSerializerConfig;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Value rendered for absent items and relations
    pub null_default: Value,

    /// XML serializer settings
    pub xml: XmlSerializerConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output encoding
    pub format: RenderFormat,

    /// Default key to nest rendered data under
    pub root_key: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when neither `-v` nor `RUST_LOG` is given
    pub level: String,

    /// Log format (compact, full, json)
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            null_default: Value::Null,
            xml: XmlSerializerConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: RenderFormat::Json,
            root_key: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file; the extension selects the format
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(Error::InvalidFormat {
                    path: path.to_path_buf(),
                    expected: "yaml, toml or json".to_string(),
                })
            }
        };

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "failed to load config");
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Get default configuration file paths to check
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".tailor.yaml"),
            PathBuf::from(".tailor.toml"),
            PathBuf::from(".tailor.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let tailor_dir = config_dir.join("tailor");
            paths.push(tailor_dir.join("config.yaml"));
            paths.push(tailor_dir.join("config.toml"));
            paths.push(tailor_dir.join("config.json"));
        }

        paths
    }

    /// Render the configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate values that cannot be checked by deserialization alone
    pub fn validate(&self) -> Result<()> {
        if self.xml.root_key.is_empty() {
            return Err(Error::config("xml.root_key must not be empty"));
        }
        if self.xml.item_key.is_empty() {
            return Err(Error::config("xml.item_key must not be empty"));
        }
        if self.xml.meta_key.is_empty() {
            return Err(Error::config("xml.meta_key must not be empty"));
        }
        if LogFormat::parse(&self.logging.format).is_none() {
            return Err(Error::config(format!(
                "logging.format must be compact, full or json, got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }
}
