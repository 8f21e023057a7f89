// src/engine/runtime.rs

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::{Id, JoinError, JoinSet};
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::component::{Component, ComponentRegistry};
use crate::config::RunConfig;
use crate::dag::{ScheduledComponent, Scheduler};
use crate::errors::{BootError, Result};
use crate::events::{EventSink, RunSummary};
use crate::exec::run_component;
use crate::types::{ComponentId, ComponentStatus};

use super::{Completion, ComponentOutcome};

/// Final state of a run, handed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Component snapshots in registration order (children included).
    pub components: Vec<Component>,
    pub summary: RunSummary,
    /// Per-component timeout the run used.
    pub timeout_ms: u64,
    /// Components that were still waiting when the run stalled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolvable: Option<Vec<ComponentId>>,
}

impl RunReport {
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id() == id)
    }

    pub fn status_of(&self, id: &str) -> Option<ComponentStatus> {
        self.component(id).map(Component::status)
    }

    /// One error per component that did not become ready, in registration
    /// order.
    pub fn failures(&self) -> Vec<BootError> {
        self.components
            .iter()
            .filter_map(|c| match c.status() {
                ComponentStatus::Failed => Some(BootError::ComponentFailure {
                    id: c.id().to_string(),
                    message: c.error().unwrap_or_default().to_string(),
                }),
                ComponentStatus::TimedOut => Some(BootError::ComponentTimeout {
                    id: c.id().to_string(),
                    timeout_ms: self.timeout_ms,
                }),
                _ => None,
            })
            .collect()
    }

    /// Turn a stalled run into [`BootError::UnresolvableDependency`].
    pub fn into_result(self) -> Result<RunReport> {
        match self.unresolvable {
            Some(waiting) => Err(BootError::UnresolvableDependency { waiting }),
            None => Ok(self),
        }
    }
}

/// Drives a [`Scheduler`] to completion, running initializers concurrently.
///
/// This is the async shell around the synchronous scheduler. It is the only
/// owner of the scheduler (and so of all status); worker tasks on the
/// `JoinSet` only ever return a [`Completion`].
pub struct BootRuntime {
    scheduler: Scheduler,
}

impl fmt::Debug for BootRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootRuntime")
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

impl BootRuntime {
    /// Validate the run and build its graph. Nothing is dispatched yet.
    pub fn new(
        registry: &ComponentRegistry,
        config: &RunConfig,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let scheduler = Scheduler::new(registry, config, sink)?;
        Ok(Self { scheduler })
    }

    pub fn from_scheduler(scheduler: Scheduler) -> Self {
        Self { scheduler }
    }

    /// Run to completion; a stalled run is returned as
    /// [`BootError::UnresolvableDependency`].
    pub async fn run(self) -> Result<RunReport> {
        self.run_report().await.into_result()
    }

    /// Main scheduling loop.
    ///
    /// - Spawns every component the scheduler dispatches, each racing its own
    ///   deadline.
    /// - Waits for whichever worker settles first and feeds the result back.
    /// - With `component_delay_ms` set, the next dispatch waits until the delay
    ///   has passed since the previous one. Completions and timeouts arriving
    ///   in the meantime are applied immediately.
    pub async fn run_report(mut self) -> RunReport {
        let delay = self.scheduler.config().component_delay();
        let mut tasks: JoinSet<Completion> = JoinSet::new();
        let mut running: HashMap<Id, (ComponentId, Instant)> = HashMap::new();
        let mut next_dispatch = Instant::now();

        let mut step = self.scheduler.start();

        loop {
            let scheduled = std::mem::take(&mut step.newly_scheduled);
            if !scheduled.is_empty() {
                next_dispatch = Instant::now() + delay;
            }
            spawn_ready(&mut tasks, &mut running, scheduled);

            if self.scheduler.is_finished() {
                break;
            }

            let joined = if !delay.is_zero() && self.scheduler.has_ready() {
                tokio::select! {
                    _ = tokio::time::sleep_until(next_dispatch) => {
                        step = self.scheduler.dispatch_more();
                        continue;
                    }
                    joined = tasks.join_next_with_id(), if !tasks.is_empty() => joined,
                }
            } else {
                tasks.join_next_with_id().await
            };

            let Some(joined) = joined else {
                error!("no components in flight but the run is not finished; stopping");
                break;
            };

            let completion = match joined {
                Ok((task_id, completion)) => {
                    running.remove(&task_id);
                    completion
                }
                Err(err) => match running.remove(&err.id()) {
                    Some((id, dispatched_at)) => Completion {
                        id,
                        outcome: ComponentOutcome::Failed(join_error_message(err)),
                        duration: Instant::now().saturating_duration_since(dispatched_at),
                    },
                    None => {
                        error!(error = %err, "worker task failed for an unknown component");
                        continue;
                    }
                },
            };

            step = self.scheduler.handle_completion(completion);
        }

        // Nothing should be left once every component is terminal; dropping
        // the set aborts anything that is.
        if !tasks.is_empty() {
            debug!(left = tasks.len(), "aborting leftover worker tasks");
            tasks.abort_all();
        }

        info!("boot runtime exiting");

        RunReport {
            components: self.scheduler.components().to_vec(),
            summary: self.scheduler.summary().cloned().unwrap_or_default(),
            timeout_ms: self.scheduler.config().timeout_ms,
            unresolvable: self.scheduler.unresolvable().map(<[_]>::to_vec),
        }
    }
}

fn spawn_ready(
    tasks: &mut JoinSet<Completion>,
    running: &mut HashMap<Id, (ComponentId, Instant)>,
    scheduled: Vec<ScheduledComponent>,
) {
    if scheduled.is_empty() {
        return;
    }

    let ids: Vec<_> = scheduled.iter().map(|s| s.id.as_str()).collect();
    debug!(?ids, "spawning initializers");

    for s in scheduled {
        let handle = tasks.spawn(run_component(
            s.id.clone(),
            s.initializer,
            s.dispatched_at,
            s.deadline,
        ));
        running.insert(handle.id(), (s.id, s.dispatched_at));
    }
}

fn join_error_message(err: JoinError) -> String {
    if err.is_panic() {
        let payload = err.into_panic();
        match panic_text(payload.as_ref()) {
            Some(text) => format!("initializer panicked: {text}"),
            None => "initializer panicked".to_string(),
        }
    } else {
        "initializer was cancelled".to_string()
    }
}

fn panic_text(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}
