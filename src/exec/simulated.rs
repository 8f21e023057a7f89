// src/exec/simulated.rs

//! Simulated setup work for components described in a boot definition file.

use std::time::Duration;

use anyhow::anyhow;

use crate::config::model::SimulateSpec;
use crate::exec::{InitFuture, Initializer};

/// Sleeps for a fixed time, then succeeds or fails with a fixed message.
#[derive(Debug, Clone, Default)]
pub struct SimulatedInitializer {
    pub duration: Duration,
    pub fail: Option<String>,
}

impl SimulatedInitializer {
    pub fn from_spec(spec: &SimulateSpec) -> Self {
        Self {
            duration: Duration::from_millis(spec.duration_ms),
            fail: spec.fail.clone(),
        }
    }
}

impl Initializer for SimulatedInitializer {
    fn initialize(&self) -> InitFuture {
        let duration = self.duration;
        let fail = self.fail.clone();

        Box::pin(async move {
            if !duration.is_zero() {
                tokio::time::sleep(duration).await;
            }
            match fail {
                Some(message) => Err(anyhow!(message)),
                None => Ok(()),
            }
        })
    }
}
