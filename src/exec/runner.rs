// src/exec/runner.rs

//! Individual component runner.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::engine::{Completion, ComponentOutcome};
use crate::exec::Initializer;
use crate::types::ComponentId;

/// Run one initializer until it settles or `deadline` passes, whichever
/// comes first.
///
/// - The timeout clock is owned by the caller: `dispatched_at` and
///   `deadline` are fixed when the component moves to `Initializing`.
/// - On timeout the initializer future is dropped. Whether that actually
///   interrupts the underlying work is up to the initializer; the result is
///   never observed either way.
pub async fn run_component(
    id: ComponentId,
    initializer: Arc<dyn Initializer>,
    dispatched_at: Instant,
    deadline: Instant,
) -> Completion {
    debug!(component = %id, "initializer started");

    let init = initializer.initialize();
    let outcome = match tokio::time::timeout_at(deadline, init).await {
        Ok(Ok(())) => ComponentOutcome::Success,
        Ok(Err(err)) => {
            let message = format!("{err:#}");
            warn!(component = %id, error = %message, "initializer reported an error");
            if message.trim().is_empty() {
                ComponentOutcome::Failed("initializer reported an error".to_string())
            } else {
                ComponentOutcome::Failed(message)
            }
        }
        Err(_elapsed) => {
            warn!(component = %id, "initializer did not settle before its deadline");
            ComponentOutcome::TimedOut
        }
    };

    Completion {
        id,
        outcome,
        duration: Instant::now().saturating_duration_since(dispatched_at),
    }
}
