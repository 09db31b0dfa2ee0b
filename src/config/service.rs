//! Configuration service for loading and generating config files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::default_log_path_for_config_dir;
use super::Config;

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path.
    /// Always uses ~/.config/inputsieve/config.toml for cross-platform consistency.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("inputsieve")
            .join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path.
    /// A missing file yields the defaults; nothing is written.
    /// Validates configuration after loading.
    /// Log path defaults to the same directory as config file.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);
        let config_dir = path.parent();

        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            let mut config = Config::default();
            config.log_path = default_log_path_for_config_dir(config_dir);
            return Ok(config);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content, config_dir)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Parse and validate configuration content.
    pub fn parse(content: &str, config_dir: Option<&Path>) -> Result<Config> {
        let mut config: Config = toml::from_str(content).context("Failed to parse config")?;

        // If log_path was not explicitly set in config, use config file directory
        let general_default = default_log_path_for_config_dir(None);
        if config.log_path == general_default {
            config.log_path = default_log_path_for_config_dir(config_dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Generate default configuration file at the default path.
    pub fn generate_default() -> Result<()> {
        Self::generate_at(&Self::default_path())
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = Self::default_config_content();
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> String {
        r#"# inputsieve configuration file

# Input keys and filter names starting with this prefix are rejected
reserved_prefix = "_interaction_"

# Extra reserved names, added to the built-in ones
# (errors, execute, filters, given, inputs, result, run, valid)
reserved_names = []

# Treat `Count`, `count` and `:count` as the same key (default: true)
fold_key_case = true

# Enable logging to file at debug level (default: false)
debug = false

# Level used when debug is off; RUST_LOG overrides it (default: "info")
log_level = "info"

# Days to keep old log files (default: 2)
log_retention_days = 2

# Path to log directory (default: same directory as config.toml/logs)
# log_path = "~/.config/inputsieve/logs"
"#
        .to_string()
    }
}
