//! File logging for the engine's `tracing` events.
//!
//! Library callers that install their own subscriber never need this; it backs
//! the `--debug` switch of the command-line tool.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use time::macros::format_description;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// File name prefix shared by the appender and the cleanup pass.
pub const LOG_PREFIX: &str = "inputsieve";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Directive used when `RUST_LOG` is unset.
fn default_directive(config: &Config) -> String {
    if config.debug {
        "debug".to_string()
    } else {
        config.log_level.to_ascii_lowercase()
    }
}

/// `RUST_LOG` wins; otherwise the configured level applies.
fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)))
}

/// Install a global subscriber writing to a daily file under `config.log_path`.
pub fn init(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.log_path)?;

    let retention = Duration::from_secs(config.log_retention_days * SECONDS_PER_DAY);
    let removed = cleanup_old_logs(&config.log_path, retention)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.log_path, LOG_PREFIX);

    let time_format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = OffsetTime::new(local_offset, time_format);

    let subscriber = tracing_subscriber::registry().with(env_filter(config)).with(
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(timer),
    );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    tracing::debug!("Logging to {}, removed {} old files", config.log_path.display(), removed);
    Ok(())
}

/// Remove engine log files not modified within `retention`.
///
/// Returns the number of files removed.
pub fn cleanup_old_logs(log_path: &Path, retention: Duration) -> Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(retention)
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let stale = logs_modified_before(log_path, cutoff)?;
    let mut removed = 0;
    for path in stale {
        if fs::remove_file(&path).is_ok() {
            removed += 1;
        }
    }
    Ok(removed)
}

/// Engine log files in `log_path` last modified before `cutoff`.
fn logs_modified_before(log_path: &Path, cutoff: SystemTime) -> Result<Vec<PathBuf>> {
    if !log_path.exists() {
        return Ok(Vec::new());
    }

    let mut stale = Vec::new();
    for entry in fs::read_dir(log_path)? {
        let path = entry?.path();
        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(LOG_PREFIX));
        if !is_log || !path.is_file() {
            continue;
        }
        let modified = fs::metadata(&path).and_then(|m| m.modified());
        if matches!(modified, Ok(at) if at < cutoff) {
            stale.push(path);
        }
    }
    stale.sort();
    Ok(stale)
}
