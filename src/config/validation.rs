//! Configuration validation.

use anyhow::{bail, Result};

use super::Config;
use crate::domain::keys::is_identifier;

/// Validate configuration.
pub fn validate(config: &Config) -> Result<()> {
    if !config.log_path.as_os_str().is_empty() {
        // Path will be created if it doesn't exist, so just check it's valid
        if config.log_path.to_string_lossy().contains('\0') {
            bail!("Invalid log_path: contains null character");
        }
    }

    if config.log_level.parse::<tracing::Level>().is_err() {
        bail!(
            "log_level '{}' must be one of trace, debug, info, warn, error",
            config.log_level
        );
    }
    if config.log_retention_days == 0 {
        bail!("log_retention_days must be at least 1");
    }

    // An empty prefix would disable the guard entirely
    if config.reserved_prefix.is_empty() {
        bail!("reserved_prefix cannot be empty");
    }
    if !is_identifier(&config.reserved_prefix) {
        bail!(
            "reserved_prefix '{}' must be a valid identifier",
            config.reserved_prefix
        );
    }

    for (i, name) in config.reserved_names.iter().enumerate() {
        let name = name.trim();
        let name = name.strip_prefix(':').unwrap_or(name);
        if name.is_empty() {
            bail!("reserved_names[{}]: name cannot be empty", i);
        }
        if !is_identifier(name) {
            bail!("reserved_names[{}]: '{}' is not a valid identifier", i, name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_empty_prefix() {
        let config = Config {
            reserved_prefix: String::new(),
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_bad_reserved_name() {
        let config = Config {
            reserved_names: vec!["ok".into(), "not ok".into()],
            ..Config::default()
        };
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("reserved_names[1]"), "{}", err);
    }

    #[test]
    fn test_accepts_symbol_style_name() {
        let config = Config {
            reserved_names: vec![":session".into()],
            ..Config::default()
        };
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let config = Config {
            log_level: "loud".into(),
            ..Config::default()
        };
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("log_level"), "{}", err);

        let config = Config {
            log_level: "WARN".into(),
            ..Config::default()
        };
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_zero_retention() {
        let config = Config {
            log_retention_days: 0,
            ..Config::default()
        };
        assert!(validate(&config).is_err());
    }
}
