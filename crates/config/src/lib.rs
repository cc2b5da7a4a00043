#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for rucfg
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/rucfg/config.toml)
//! - Environment variables
//! - CLI flags

pub mod constants;

use rucfg_errors::{ConfigError, Error};
use rucfg_types::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub limits: LimitsConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_table_name")]
    pub table_name: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: OutputFormat,
}

/// Bounds enforced by the in-process limiter processors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_connections_cap")]
    pub max_connections_cap: u64,
    #[serde(default)]
    pub cpu_count: usize, // 0 = auto-detect
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: OutputFormat::Plain,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_connections_cap: default_max_connections_cap(),
            cpu_count: 0,
        }
    }
}

// Default value functions for serde
fn default_table_name() -> String {
    constants::RESOURCE_UNIT_TABLE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_connections_cap() -> u64 {
    1_000_000
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("rucfg").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // RUCFG_LOG_LEVEL
        if let Ok(level) = std::env::var("RUCFG_LOG_LEVEL") {
            if !LOG_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "RUCFG_LOG_LEVEL".to_string(),
                    value: level,
                }
                .into());
            }
            self.logging.level = level;
        }

        // RUCFG_LOG_FORMAT
        if let Ok(format) = std::env::var("RUCFG_LOG_FORMAT") {
            self.logging.format = match format.as_str() {
                "plain" => OutputFormat::Plain,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "RUCFG_LOG_FORMAT".to_string(),
                        value: format,
                    }
                    .into())
                }
            };
        }

        // RUCFG_CPU_COUNT
        if let Ok(cpus) = std::env::var("RUCFG_CPU_COUNT") {
            self.limits.cpu_count = cpus.parse().map_err(|_| ConfigError::InvalidValue {
                field: "RUCFG_CPU_COUNT".to_string(),
                value: cpus,
            })?;
        }

        // RUCFG_MAX_CONNECTIONS_CAP
        if let Ok(cap) = std::env::var("RUCFG_MAX_CONNECTIONS_CAP") {
            self.limits.max_connections_cap =
                cap.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "RUCFG_MAX_CONNECTIONS_CAP".to_string(),
                    value: cap,
                })?;
        }

        self.validate()
    }

    /// Check cross-field constraints that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns an error if the table name is empty, the log level is unknown,
    /// or the connection cap is zero.
    pub fn validate(&self) -> Result<(), Error> {
        if self.general.table_name.is_empty() {
            return Err(ConfigError::Invalid {
                message: "general.table_name must not be empty".to_string(),
            }
            .into());
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
            }
            .into());
        }
        if self.limits.max_connections_cap == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_connections_cap".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Cores available to cpu quotas (with auto-detection)
    #[must_use]
    pub fn cpu_count(&self) -> usize {
        calculate_cpu_count(self.limits.cpu_count)
    }
}

/// Resolve the configured core count, auto-detecting when unset
#[must_use]
pub fn calculate_cpu_count(config_value: usize) -> usize {
    if config_value > 0 {
        config_value // User override
    } else {
        num_cpus::get().max(1)
    }
}
