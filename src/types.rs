use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical component identifier used throughout the engine.
pub type ComponentId = String;

/// Lifecycle status of a component.
///
/// `Waiting -> Initializing -> {Ready | Failed | TimedOut}`. A waiting
/// component may also go straight to `Failed` when an upstream dependency
/// fails or the run cannot make progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Waiting,
    Initializing,
    Ready,
    Failed,
    TimedOut,
}

impl ComponentStatus {
    /// `Ready`, `Failed` and `TimedOut` are final.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ComponentStatus::Ready | ComponentStatus::Failed | ComponentStatus::TimedOut
        )
    }

    /// `Failed` or `TimedOut`; both foreclose dependents.
    pub fn is_failure(self) -> bool {
        matches!(self, ComponentStatus::Failed | ComponentStatus::TimedOut)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentStatus::Waiting => "waiting",
            ComponentStatus::Initializing => "initializing",
            ComponentStatus::Ready => "ready",
            ComponentStatus::Failed => "failed",
            ComponentStatus::TimedOut => "timed_out",
        }
    }
}

impl Default for ComponentStatus {
    fn default() -> Self {
        ComponentStatus::Waiting
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "waiting" => Ok(ComponentStatus::Waiting),
            "initializing" => Ok(ComponentStatus::Initializing),
            "ready" => Ok(ComponentStatus::Ready),
            "failed" => Ok(ComponentStatus::Failed),
            "timed_out" | "timedout" => Ok(ComponentStatus::TimedOut),
            other => Err(format!(
                "invalid component status: {other} \
                 (expected waiting, initializing, ready, failed or timed_out)"
            )),
        }
    }
}
