// src/dag/mod.rs

//! Dependency graph, status tracking and scheduling.
//!
//! - [`graph`] holds the immutable dependency graph of one run and rejects
//!   cycles.
//! - [`tracker`] owns per-component status and applies transitions,
//!   including cascading failure.
//! - [`scheduler`] is the synchronous state machine that decides which
//!   components to dispatch next.
//! - [`scheduler_step`] defines the result type of a scheduler step.

pub mod graph;
pub mod scheduler;
pub mod scheduler_step;
pub mod tracker;

pub use graph::DependencyGraph;
pub use scheduler::Scheduler;
pub use scheduler_step::{ScheduledComponent, SchedulerStep};
pub use tracker::StatusTracker;
