// src/engine/mod.rs

//! Orchestration engine for bootdag.
//!
//! The pure scheduling state machine lives in [`crate::dag::Scheduler`]; this
//! module holds the async shell around it ([`runtime`]) plus the types that
//! flow between worker tasks and the scheduling loop.

use std::time::Duration;

use crate::types::ComponentId;

/// How a component's initializer settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentOutcome {
    Success,
    /// The initializer reported an error (or panicked).
    Failed(String),
    /// The deadline passed before the initializer settled.
    TimedOut,
}

/// Result reported by a worker task back to the scheduling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub id: ComponentId,
    pub outcome: ComponentOutcome,
    /// Time from dispatch until the outcome was known.
    pub duration: Duration,
}

impl Completion {
    pub fn new(id: impl Into<ComponentId>, outcome: ComponentOutcome, duration: Duration) -> Self {
        Self {
            id: id.into(),
            outcome,
            duration,
        }
    }
}

pub mod runtime;

pub use runtime::{BootRuntime, RunReport};
