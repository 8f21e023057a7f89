// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `bootdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bootdag",
    version,
    about = "Run a dependency-ordered boot sequence and report component status.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the boot definition (TOML).
    ///
    /// Default: `Bootdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Bootdag.toml")]
    pub config: String,

    /// Override `[run].parallelism_cap`.
    #[arg(long, value_name = "N")]
    pub parallelism: Option<usize>,

    /// Override `[run].timeout_ms`.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Override `[run].component_delay_ms`.
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Only run these components (repeatable). Replaces `[run].include`.
    #[arg(long = "only", value_name = "ID")]
    pub only: Vec<String>,

    /// Print events and the final report as JSON lines on stdout.
    #[arg(long)]
    pub json: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BOOTDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the boot order, but don't initialize anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
