// src/logging.rs

//! Diagnostics for `bootdag` runs.
//!
//! The filter is chosen in this order:
//! 1. `--log-level`, applied to the `bootdag` target only
//! 2. `BOOTDAG_LOG`, taken as full `EnvFilter` directives
//!    (e.g. `bootdag::dag=debug,tokio=warn`)
//! 3. `bootdag` at info, everything else at warn
//!
//! Diagnostics go to stderr. Stdout is reserved for `--json` lines and the
//! final report.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "BOOTDAG_LOG";

const DEFAULT_DIRECTIVES: &str = "warn,bootdag=info";

/// Install the global subscriber. Call once, before the run starts.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let directives = filter_directives(cli_level, env.as_deref());
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter {directives:?} (check {LOG_ENV})"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Filter directives for a CLI level and the raw `BOOTDAG_LOG` value.
///
/// A blank environment value counts as unset.
pub fn filter_directives(cli_level: Option<LogLevel>, env: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return format!("warn,bootdag={}", level_directive(level));
    }
    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => directives.to_string(),
        None => DEFAULT_DIRECTIVES.to_string(),
    }
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
