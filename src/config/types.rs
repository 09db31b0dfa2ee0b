//! Configuration data types.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::validation;
use crate::domain::keys::{KeyPolicy, DEFAULT_RESERVED_PREFIX};

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix reserved for internal machinery; keys starting with it are rejected
    pub reserved_prefix: String,

    /// Extra reserved names, on top of the built-in ones
    pub reserved_names: Vec<String>,

    /// Treat `Count`, `count` and `:count` as the same key
    pub fold_key_case: bool,

    /// Enable logging to file; also lowers the level to `debug`
    pub debug: bool,

    /// Level for file logging when `debug` is off and `RUST_LOG` is unset
    pub log_level: String,

    /// Log files older than this many days are removed at startup
    pub log_retention_days: u64,

    /// Path to log directory
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reserved_prefix: DEFAULT_RESERVED_PREFIX.to_string(),
            reserved_names: Vec::new(),
            fold_key_case: true,
            debug: false,
            log_level: "info".to_string(),
            log_retention_days: 2,
            log_path: default_log_path(),
        }
    }
}

impl Config {
    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Key policy for registries built under this configuration.
    pub fn key_policy(&self) -> KeyPolicy {
        KeyPolicy::new(&self.reserved_prefix, &self.reserved_names, self.fold_key_case)
    }
}

/// Get default log path (relative to config directory).
/// This returns a placeholder; `ConfigService` sets the real path from the
/// config file location.
pub fn default_log_path() -> PathBuf {
    default_log_path_for_config_dir(None)
}

/// Get log path based on config directory.
pub fn default_log_path_for_config_dir(config_dir: Option<&Path>) -> PathBuf {
    config_dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join("inputsieve")
        })
        .join("logs")
}
