// src/events/subscriber.rs

//! Ready-made subscribers used by the CLI.

use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{BootEvent, EventBus};
use crate::types::ComponentStatus;

/// Log every event through `tracing` until the run completes.
pub fn spawn_log_subscriber(bus: &EventBus) -> JoinHandle<()> {
    let rx = bus.subscribe();
    tokio::spawn(consume(rx, log_event))
}

/// Print every event as one JSON line on stdout until the run completes.
pub fn spawn_json_subscriber(bus: &EventBus) -> JoinHandle<()> {
    let rx = bus.subscribe();
    tokio::spawn(consume(rx, |event| match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(e) => warn!(error = %e, "failed to serialize boot event"),
    }))
}

async fn consume<F>(mut rx: Receiver<BootEvent>, mut handle: F)
where
    F: FnMut(&BootEvent),
{
    loop {
        match rx.recv().await {
            Ok(event) => {
                handle(&event);
                if matches!(event, BootEvent::RunCompleted(_)) {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "event subscriber fell behind; events dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn log_event(event: &BootEvent) {
    match event {
        BootEvent::StatusChanged(change) => match change.current {
            ComponentStatus::Failed | ComponentStatus::TimedOut => warn!(
                component = %change.component_id,
                from = %change.previous,
                to = %change.current,
                at_ms = change.at_ms,
                duration_ms = ?change.duration_ms,
                error = change.error.as_deref().unwrap_or(""),
                "component status changed"
            ),
            _ => info!(
                component = %change.component_id,
                from = %change.previous,
                to = %change.current,
                at_ms = change.at_ms,
                duration_ms = ?change.duration_ms,
                "component status changed"
            ),
        },
        BootEvent::RunCompleted(summary) => info!(
            total_ms = summary.total_duration_ms,
            ready = summary.ready,
            failed = summary.failed,
            timed_out = summary.timed_out,
            waiting = summary.waiting,
            "boot sequence finished"
        ),
    }
}
