#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bootdag::events::{BootEvent, EventSink, RunSummary, StatusChange};
use bootdag::types::ComponentStatus;

/// Event sink that keeps every published event, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<BootEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BootEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn status_changes(&self) -> Vec<StatusChange> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BootEvent::StatusChanged(change) => Some(change),
                BootEvent::RunCompleted(_) => None,
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<RunSummary> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BootEvent::RunCompleted(summary) => Some(summary),
                BootEvent::StatusChanged(_) => None,
            })
            .collect()
    }

    /// Statuses `id` moved through, starting with its first new status.
    pub fn transitions_for(&self, id: &str) -> Vec<ComponentStatus> {
        self.status_changes()
            .into_iter()
            .filter(|c| c.component_id == id)
            .map(|c| c.current)
            .collect()
    }

    /// Ids in the order they entered `status`.
    pub fn entered(&self, status: ComponentStatus) -> Vec<String> {
        self.status_changes()
            .into_iter()
            .filter(|c| c.current == status)
            .map(|c| c.component_id)
            .collect()
    }

    /// Position of the event where `id` entered `status`.
    pub fn position_of(&self, id: &str, status: ComponentStatus) -> Option<usize> {
        self.status_changes()
            .iter()
            .position(|c| c.component_id == id && c.current == status)
    }

    /// Highest number of components `Initializing` at once, replayed from the
    /// event stream.
    pub fn max_initializing(&self) -> usize {
        let mut current = 0usize;
        let mut max = 0usize;
        for change in self.status_changes() {
            if change.current == ComponentStatus::Initializing {
                current += 1;
                max = max.max(current);
            } else if change.previous == ComponentStatus::Initializing {
                current -= 1;
            }
        }
        max
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: BootEvent) {
        self.events.lock().unwrap().push(event);
    }
}
