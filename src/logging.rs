// src/logging.rs

//! Logging setup for `ocr-reduce` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `OCR_REDUCE_LOG` environment variable (e.g. "info", "debug")
//! 3. `[log] level` from the config file
//! 4. default to `info`
//!
//! Logs are sent to STDERR so that stdout carries only the benchmark report.

use tracing_subscriber::fmt;

use crate::cli::LogLevel;
use crate::errors::{ReduceError, Result};

pub const LOG_ENV_VAR: &str = "OCR_REDUCE_LOG";

/// Initialise global logging subscriber.
///
/// Call once at startup; a second call fails.
pub fn init_logging(cli_level: Option<LogLevel>, file_level: Option<LogLevel>) -> Result<()> {
    let env_level = std::env::var(LOG_ENV_VAR).ok().and_then(|s| parse_level_str(&s));
    let level = resolve_level(cli_level, env_level, file_level);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| ReduceError::Other(anyhow::anyhow!("failed to install logger: {e}")))?;

    Ok(())
}

/// Pick the effective level from the three optional sources.
pub fn resolve_level(
    cli_level: Option<LogLevel>,
    env_level: Option<tracing::Level>,
    file_level: Option<LogLevel>,
) -> tracing::Level {
    cli_level
        .map(level_from_log_level)
        .or(env_level)
        .or(file_level.map(level_from_log_level))
        .unwrap_or(tracing::Level::INFO)
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
