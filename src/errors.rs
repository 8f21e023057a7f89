// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootError {
    /// Malformed component: empty id, duplicate id or self-dependency.
    #[error("Invalid component definition: {0}")]
    InvalidDefinition(String),

    #[error("Cyclic dependency: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("Component '{id}' failed: {message}")]
    ComponentFailure { id: String, message: String },

    #[error("Component '{id}' timed out after {timeout_ms}ms")]
    ComponentTimeout { id: String, timeout_ms: u64 },

    /// Scheduling stalled with components still waiting and nothing in flight.
    #[error("Unresolvable dependency; still waiting: {}", .waiting.join(", "))]
    UnresolvableDependency { waiting: Vec<String> },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BootError>;
