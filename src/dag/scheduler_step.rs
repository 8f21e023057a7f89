// src/dag/scheduler_step.rs

//! Step-by-step result types for the scheduler.

use std::sync::Arc;

use tokio::time::Instant;

use crate::exec::Initializer;
use crate::types::ComponentId;

/// A component the scheduler has moved to `Initializing` and wants run now.
#[derive(Clone)]
pub struct ScheduledComponent {
    pub id: ComponentId,
    pub initializer: Arc<dyn Initializer>,
    /// When the component entered `Initializing`; its timeout clock starts here.
    pub dispatched_at: Instant,
    /// `dispatched_at + timeout`.
    pub deadline: Instant,
}

impl std::fmt::Debug for ScheduledComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledComponent")
            .field("id", &self.id)
            .field("dispatched_at", &self.dispatched_at)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

/// Structured result of a single scheduler "step".
///
/// Useful for tests that drive the scheduler by hand and make assertions
/// about what changed.
#[derive(Debug, Clone, Default)]
pub struct SchedulerStep {
    /// Components dispatched by this step, in dispatch order.
    pub newly_scheduled: Vec<ScheduledComponent>,
    /// Components newly marked `Failed`/`TimedOut` in this step (the
    /// component that failed plus any cascaded dependents).
    pub newly_failed: Vec<ComponentId>,
    /// Set when this step found the run stalled; holds the components that
    /// were still waiting.
    pub unresolvable: Option<Vec<ComponentId>>,
    /// Whether this step finished the run.
    pub run_just_finished: bool,
}

impl SchedulerStep {
    pub fn scheduled_ids(&self) -> Vec<&str> {
        self.newly_scheduled.iter().map(|s| s.id.as_str()).collect()
    }
}
