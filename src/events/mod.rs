// src/events/mod.rs

//! Status and timing events.
//!
//! The scheduler only knows about the [`EventSink`] capability; anything that
//! wants to observe a run (a renderer, a logger, a test) subscribes to an
//! [`EventBus`] instead of reaching into scheduler state.

pub mod bus;
pub mod subscriber;

use serde::Serialize;

use crate::types::{ComponentId, ComponentStatus};

pub use bus::{EventBus, EventSink};
pub use subscriber::{spawn_json_subscriber, spawn_log_subscriber};

/// One applied status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub component_id: ComponentId,
    pub previous: ComponentStatus,
    pub current: ComponentStatus,
    /// Milliseconds since the run started.
    pub at_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate emitted once when a run completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_duration_ms: u64,
    pub components: usize,
    pub ready: usize,
    pub failed: usize,
    pub timed_out: usize,
    /// Components that never left `Waiting` (only possible for disabled runs).
    pub waiting: usize,
}

impl RunSummary {
    /// `true` when every component reached `Ready`.
    pub fn all_ready(&self) -> bool {
        self.ready == self.components
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BootEvent {
    StatusChanged(StatusChange),
    RunCompleted(RunSummary),
}
