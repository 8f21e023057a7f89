// src/dag/tracker.rs

//! Per-run status bookkeeping.
//!
//! The tracker is the only place that writes component status. Every applied
//! transition is published to the run's [`EventSink`] before the call returns,
//! so subscribers observe events in exactly the order transitions happened.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::component::Component;
use crate::dag::DependencyGraph;
use crate::engine::ComponentOutcome;
use crate::events::{BootEvent, EventSink, RunSummary, StatusChange};
use crate::types::{ComponentId, ComponentStatus};

pub struct StatusTracker {
    /// Components of this run, in registration order.
    components: Vec<Component>,
    index: HashMap<ComponentId, usize>,
    run_started: Instant,
    timeout: Duration,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for StatusTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusTracker")
            .field("components", &self.components)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl StatusTracker {
    pub fn new(components: Vec<Component>, timeout: Duration, sink: Arc<dyn EventSink>) -> Self {
        let index = components
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id().to_string(), i))
            .collect();

        Self {
            components,
            index,
            run_started: Instant::now(),
            timeout,
            sink,
        }
    }

    /// Restart the run clock; event timestamps are relative to it.
    pub fn mark_run_started(&mut self) {
        self.run_started = Instant::now();
    }

    pub fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.run_started)
    }

    pub fn status_of(&self, id: &str) -> Option<ComponentStatus> {
        self.component(id).map(Component::status)
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.index.get(id).map(|&i| &self.components[i])
    }

    /// Read-only snapshots, in registration order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn count(&self, status: ComponentStatus) -> usize {
        self.components
            .iter()
            .filter(|c| c.status() == status)
            .count()
    }

    pub fn in_flight(&self) -> usize {
        self.count(ComponentStatus::Initializing)
    }

    pub fn all_terminal(&self) -> bool {
        self.components.iter().all(|c| c.status().is_terminal())
    }

    /// Ids still `Waiting`, in registration order.
    pub fn waiting(&self) -> Vec<ComponentId> {
        self.components
            .iter()
            .filter(|c| c.status() == ComponentStatus::Waiting)
            .map(|c| c.id().to_string())
            .collect()
    }

    /// `Waiting -> Initializing`.
    ///
    /// Returns `false` (and changes nothing) if the component is unknown or
    /// not `Waiting`.
    pub fn begin(&mut self, id: &str) -> bool {
        match self.status_of(id) {
            Some(ComponentStatus::Waiting) => {}
            other => {
                warn!(
                    component = %id,
                    status = ?other,
                    "refusing to start component that is not waiting"
                );
                return false;
            }
        }

        self.apply(id, ComponentStatus::Initializing, None, None)
    }

    /// `Initializing -> Ready | Failed | TimedOut`, cascading failures to
    /// every transitive dependent.
    ///
    /// Returns the ids newly marked `Failed`/`TimedOut` by this call (the
    /// component itself first, then cascaded dependents). A result for a
    /// component that is not `Initializing` is discarded.
    pub fn finish(
        &mut self,
        graph: &DependencyGraph,
        id: &str,
        outcome: ComponentOutcome,
        duration: Duration,
    ) -> Vec<ComponentId> {
        if self.status_of(id) != Some(ComponentStatus::Initializing) {
            warn!(
                component = %id,
                status = ?self.status_of(id),
                "discarding result for component that is not initializing"
            );
            return Vec::new();
        }

        let duration_ms = duration.as_millis() as u64;

        match outcome {
            ComponentOutcome::Success => {
                self.apply(id, ComponentStatus::Ready, Some(duration_ms), None);
                Vec::new()
            }
            ComponentOutcome::Failed(message) => {
                self.apply(id, ComponentStatus::Failed, Some(duration_ms), Some(message));
                let mut failed = vec![id.to_string()];
                failed.extend(self.cascade(graph, id));
                failed
            }
            ComponentOutcome::TimedOut => {
                let message = format!("timed out after {}ms", self.timeout.as_millis());
                self.apply(id, ComponentStatus::TimedOut, Some(duration_ms), Some(message));
                let mut failed = vec![id.to_string()];
                failed.extend(self.cascade(graph, id));
                failed
            }
        }
    }

    /// Mark every transitive dependent of `root` that is still `Waiting` as
    /// `Failed`, without it ever starting.
    pub fn cascade(&mut self, graph: &DependencyGraph, root: &str) -> Vec<ComponentId> {
        let mut queue: VecDeque<ComponentId> = graph.dependents_of(root).iter().cloned().collect();
        let mut visited: HashSet<ComponentId> = HashSet::new();
        let mut newly_failed = Vec::new();
        let message = format!("blocked by failed dependency: {root}");

        while let Some(name) = queue.pop_front() {
            if !visited.insert(name.clone()) {
                continue;
            }

            if self.status_of(&name) == Some(ComponentStatus::Waiting) {
                debug!(
                    component = %name,
                    upstream = %root,
                    "failing dependent of failed component"
                );
                self.apply(&name, ComponentStatus::Failed, Some(0), Some(message.clone()));
                newly_failed.push(name.clone());
            }

            queue.extend(graph.dependents_of(&name).iter().cloned());
        }

        newly_failed
    }

    /// Fail every component still `Waiting`; used when the run cannot make
    /// progress. `reason` builds the error message for each id.
    pub fn fail_waiting<F>(&mut self, reason: F) -> Vec<ComponentId>
    where
        F: Fn(&str) -> String,
    {
        let waiting = self.waiting();
        for name in &waiting {
            let message = reason(name);
            self.apply(name, ComponentStatus::Failed, Some(0), Some(message));
        }
        waiting
    }

    /// Build the run summary and publish it.
    pub fn complete_run(&self) -> RunSummary {
        let summary = RunSummary {
            total_duration_ms: self.elapsed().as_millis() as u64,
            components: self.components.len(),
            ready: self.count(ComponentStatus::Ready),
            failed: self.count(ComponentStatus::Failed),
            timed_out: self.count(ComponentStatus::TimedOut),
            waiting: self.count(ComponentStatus::Waiting),
        };
        self.sink.publish(BootEvent::RunCompleted(summary.clone()));
        summary
    }

    /// Apply one transition and publish it. Terminal components never change.
    fn apply(
        &mut self,
        id: &str,
        next: ComponentStatus,
        duration_ms: Option<u64>,
        error: Option<String>,
    ) -> bool {
        let at_ms = self.elapsed().as_millis() as u64;
        let Some(&i) = self.index.get(id) else {
            warn!(component = %id, "transition for unknown component; ignoring");
            return false;
        };

        let component = &mut self.components[i];
        let previous = component.status();
        if previous.is_terminal() {
            warn!(
                component = %id,
                status = %previous,
                "component already terminal; ignoring transition"
            );
            return false;
        }

        match duration_ms {
            Some(ms) => component.settle(next, ms, error.clone()),
            None => component.set_status(next),
        }

        debug!(component = %id, from = %previous, to = %next, at_ms, "status transition");

        self.sink.publish(BootEvent::StatusChanged(StatusChange {
            component_id: id.to_string(),
            previous,
            current: next,
            at_ms,
            duration_ms,
            error,
        }));
        true
    }
}
