use std::collections::HashMap;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::component::{Component, ComponentRegistry};
use crate::config::RunConfig;
use crate::dag::graph::DependencyGraph;
use crate::dag::scheduler_step::{ScheduledComponent, SchedulerStep};
use crate::dag::tracker::StatusTracker;
use crate::engine::Completion;
use crate::events::{EventSink, RunSummary};
use crate::exec::Initializer;
use crate::types::{ComponentId, ComponentStatus};

/// Scheduler holds the immutable dependency graph plus the run's status.
///
/// It is synchronous and performs no IO: the async shell
/// ([`BootRuntime`](crate::engine::BootRuntime)) runs the initializers and
/// feeds their completions back in. It is responsible for:
/// - deciding which `Waiting` components are ready (dependencies `Ready`)
/// - dispatching them in registration order, never exceeding the
///   parallelism cap
/// - applying completions and cascading failures
/// - detecting a stalled run and finishing the run exactly once
pub struct Scheduler {
    graph: DependencyGraph,
    tracker: StatusTracker,
    initializers: HashMap<ComponentId, Arc<dyn Initializer>>,
    config: RunConfig,
    started: bool,
    summary: Option<RunSummary>,
    unresolvable: Option<Vec<ComponentId>>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("graph", &self.graph)
            .field("tracker", &self.tracker)
            .field("config", &self.config)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Prepare a run over the components of `registry` selected by `config`.
    ///
    /// Configuration, selection and graph errors (including cycles) are
    /// returned here, before anything is scheduled.
    pub fn new(
        registry: &ComponentRegistry,
        config: &RunConfig,
        sink: Arc<dyn EventSink>,
    ) -> crate::errors::Result<Self> {
        config.validate()?;

        let selected = registry.select(&config.included_component_ids)?;
        let graph = DependencyGraph::build(selected.iter().map(|e| &e.component))?;

        let mut initializers = HashMap::new();
        let mut components = Vec::with_capacity(selected.len());
        for entry in selected {
            initializers.insert(entry.component.id().to_string(), entry.initializer);
            components.push(entry.component);
        }

        let tracker = StatusTracker::new(components, config.timeout(), sink);

        debug!(
            components = graph.len(),
            parallelism_cap = config.parallelism_cap,
            timeout_ms = config.timeout_ms,
            "scheduler prepared"
        );

        Ok(Self {
            graph,
            tracker,
            initializers,
            config: config.clone(),
            started: false,
            summary: None,
            unresolvable: None,
        })
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn status_of(&self, id: &str) -> Option<ComponentStatus> {
        self.tracker.status_of(id)
    }

    /// Read-only component snapshots, in registration order.
    pub fn components(&self) -> &[Component] {
        self.tracker.components()
    }

    pub fn in_flight(&self) -> usize {
        self.tracker.in_flight()
    }

    /// Whether the run has emitted its summary.
    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Components left waiting when the run stalled, if it did.
    pub fn unresolvable(&self) -> Option<&[ComponentId]> {
        self.unresolvable.as_deref()
    }

    /// Dependencies of `id` not currently `Ready`.
    pub fn unresolved_dependencies(&self, id: &str) -> Vec<ComponentId> {
        self.graph
            .unresolved_dependencies(id, |dep| self.tracker.status_of(dep))
    }

    /// Whether a slot is free and some component could be dispatched now.
    pub fn has_ready(&self) -> bool {
        self.started
            && !self.is_finished()
            && self.tracker.in_flight() < self.config.parallelism_cap
            && self.next_ready().is_some()
    }

    /// Start the run and dispatch the first ready components.
    ///
    /// A disabled run finishes immediately with every component `Waiting`.
    pub fn start(&mut self) -> SchedulerStep {
        if self.started {
            warn!("scheduler already started; ignoring");
            return SchedulerStep::default();
        }
        self.started = true;
        self.tracker.mark_run_started();

        if !self.config.enabled {
            info!("boot sequence disabled; finishing without dispatching");
            let mut step = SchedulerStep::default();
            self.finish(&mut step);
            return step;
        }

        info!(components = self.graph.len(), "boot sequence started");
        let mut step = SchedulerStep::default();
        self.advance(&mut step);
        step
    }

    /// Apply a completion reported by the async shell, then dispatch whatever
    /// became ready.
    pub fn handle_completion(&mut self, completion: Completion) -> SchedulerStep {
        let mut step = SchedulerStep::default();

        if !self.started || self.is_finished() {
            warn!(component = %completion.id, "completion outside an active run; ignoring");
            return step;
        }

        debug!(
            component = %completion.id,
            outcome = ?completion.outcome,
            duration_ms = completion.duration.as_millis() as u64,
            "component settled"
        );

        step.newly_failed = self.tracker.finish(
            &self.graph,
            &completion.id,
            completion.outcome,
            completion.duration,
        );
        self.advance(&mut step);
        step
    }

    /// Dispatch more ready components without a new completion (used when
    /// dispatches are paced one at a time).
    pub fn dispatch_more(&mut self) -> SchedulerStep {
        let mut step = SchedulerStep::default();
        if self.started && !self.is_finished() {
            self.advance(&mut step);
        }
        step
    }

    /// Dispatch up to the per-step limit, then check for a stall or the end
    /// of the run.
    fn advance(&mut self, step: &mut SchedulerStep) {
        let limit = self.dispatch_limit();

        while step.newly_scheduled.len() < limit
            && self.tracker.in_flight() < self.config.parallelism_cap
        {
            let Some(id) = self.next_ready() else {
                break;
            };
            if let Some(scheduled) = self.dispatch(&id) {
                step.newly_scheduled.push(scheduled);
            } else {
                break;
            }
        }

        if self.tracker.in_flight() == 0 && !self.tracker.waiting().is_empty() {
            self.fail_unresolvable(step);
        }

        if self.tracker.all_terminal() {
            self.finish(step);
        }
    }

    /// With pacing enabled, at most one component starts per step.
    fn dispatch_limit(&self) -> usize {
        if self.config.component_delay_ms > 0 {
            1
        } else {
            self.config.parallelism_cap
        }
    }

    /// First `Waiting` component, in registration order, whose dependencies
    /// are all `Ready`.
    fn next_ready(&self) -> Option<ComponentId> {
        self.graph
            .ids()
            .find(|id| {
                self.graph
                    .is_ready_to_start(id, |dep| self.tracker.status_of(dep))
            })
            .map(str::to_string)
    }

    fn dispatch(&mut self, id: &str) -> Option<ScheduledComponent> {
        let initializer = match self.initializers.get(id) {
            Some(init) => Arc::clone(init),
            None => {
                warn!(component = %id, "no initializer registered");
                return None;
            }
        };

        if !self.tracker.begin(id) {
            return None;
        }

        let dispatched_at = Instant::now();
        info!(
            component = %id,
            in_flight = self.tracker.in_flight(),
            "dependencies ready; initializing"
        );

        Some(ScheduledComponent {
            id: id.to_string(),
            initializer,
            dispatched_at,
            deadline: dispatched_at + self.config.timeout(),
        })
    }

    fn fail_unresolvable(&mut self, step: &mut SchedulerStep) {
        let waiting = self.tracker.waiting();
        let reasons: HashMap<ComponentId, Vec<ComponentId>> = waiting
            .iter()
            .map(|id| (id.clone(), self.unresolved_dependencies(id)))
            .collect();

        warn!(waiting = ?waiting, "no progress possible; failing waiting components");

        let failed = self.tracker.fail_waiting(|id| {
            let deps = reasons.get(id).cloned().unwrap_or_default();
            format!("unresolvable dependency: {}", deps.join(", "))
        });
        step.newly_failed.extend(failed);
        step.unresolvable = Some(waiting.clone());
        self.unresolvable = Some(waiting);
    }

    fn finish(&mut self, step: &mut SchedulerStep) {
        if self.summary.is_some() {
            return;
        }
        let summary = self.tracker.complete_run();
        info!(
            total_ms = summary.total_duration_ms,
            ready = summary.ready,
            failed = summary.failed,
            timed_out = summary.timed_out,
            "boot sequence complete"
        );
        self.summary = Some(summary);
        step.run_just_finished = true;
    }
}
