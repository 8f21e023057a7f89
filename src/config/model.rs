// src/config/model.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{BootError, Result};

/// Run configuration: a value object built once per run.
///
/// ```toml
/// [run]
/// enabled = true
/// timeout_ms = 5000
/// component_delay_ms = 0
/// parallelism_cap = 4
/// include = ["database", "cache"]
/// ```
///
/// All fields are optional and have reasonable defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// When `false` the run finishes immediately without dispatching.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Per-component timeout, measured from dispatch.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Pause between dispatches, for visualization pacing only.
    #[serde(default)]
    pub component_delay_ms: u64,

    /// Hard ceiling on concurrently initializing components.
    #[serde(default = "default_parallelism_cap")]
    pub parallelism_cap: usize,

    /// Components taking part in the run. Empty means every registered
    /// component.
    #[serde(default, rename = "include")]
    pub included_component_ids: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_parallelism_cap() -> usize {
    4
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timeout_ms: default_timeout_ms(),
            component_delay_ms: 0,
            parallelism_cap: default_parallelism_cap(),
            included_component_ids: Vec::new(),
        }
    }
}

impl RunConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn component_delay(&self) -> Duration {
        Duration::from_millis(self.component_delay_ms)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_parallelism_cap(mut self, cap: usize) -> Self {
        self.parallelism_cap = cap;
        self
    }

    pub fn with_component_delay_ms(mut self, delay_ms: u64) -> Self {
        self.component_delay_ms = delay_ms;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn including<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.included_component_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Basic sanity checks; run before anything is scheduled.
    pub fn validate(&self) -> Result<()> {
        if self.parallelism_cap == 0 {
            return Err(BootError::ConfigError(
                "parallelism_cap must be >= 1 (got 0)".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(BootError::ConfigError(
                "timeout_ms must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level boot definition as read from a TOML file (unvalidated).
///
/// ```toml
/// [run]
/// parallelism_cap = 2
///
/// [[component]]
/// id = "database"
/// name = "Database"
/// after = ["config"]
/// simulate = { duration_ms = 200 }
/// ```
///
/// Components are an array of tables so that file order is registration
/// order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBootFile {
    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub component: Vec<ComponentSpec>,
}

/// Validated boot definition. Construct it through `TryFrom<RawBootFile>`.
#[derive(Debug, Clone)]
pub struct BootFile {
    pub run: RunConfig,
    pub component: Vec<ComponentSpec>,
}

impl BootFile {
    /// Only for use by `validate.rs` after checks have passed.
    pub(crate) fn new_unchecked(run: RunConfig, component: Vec<ComponentSpec>) -> Self {
        Self { run, component }
    }
}

/// `[[component]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentSpec {
    pub id: String,

    /// Display name; defaults to the id.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Ids that must be `Ready` before this component starts.
    #[serde(default, alias = "dependencies")]
    pub after: Vec<String>,

    /// Presentational sub-components.
    #[serde(default)]
    pub children: Vec<ComponentSpec>,

    /// What the simulated initializer does.
    #[serde(default)]
    pub simulate: SimulateSpec,
}

impl ComponentSpec {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// `simulate = { duration_ms = 100, fail = "disk full" }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulateSpec {
    #[serde(default)]
    pub duration_ms: u64,

    /// If set, the component fails with this message after `duration_ms`.
    #[serde(default)]
    pub fail: Option<String>,
}
