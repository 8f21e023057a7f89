// src/events/bus.rs

use tokio::sync::broadcast;
use tracing::trace;

use super::BootEvent;

/// Publish capability the scheduler depends on.
///
/// `publish` is called synchronously with each transition, from the
/// scheduling loop, so implementations must return promptly.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: BootEvent);
}

/// Fan-out of [`BootEvent`]s to any number of subscribers.
///
/// Built on a bounded `tokio::sync::broadcast` channel: publishing never
/// waits for subscribers. A subscriber that falls more than `capacity`
/// events behind sees `RecvError::Lagged` and skips ahead; it can never
/// stall initialization.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BootEvent>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BootEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl EventSink for EventBus {
    fn publish(&self, event: BootEvent) {
        // Err only means nobody is listening right now.
        if self.tx.send(event).is_err() {
            trace!("boot event dropped; no subscribers");
        }
    }
}
