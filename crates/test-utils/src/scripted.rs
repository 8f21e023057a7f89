#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::anyhow;
use bootdag::exec::{InitFuture, Initializer};

/// What a scripted initializer does when called.
#[derive(Debug, Clone)]
pub enum Script {
    /// Succeed on first poll.
    Succeed,
    /// Sleep, then succeed.
    SucceedAfter(Duration),
    /// Fail with the given message on first poll.
    Fail(String),
    /// Sleep, then fail with the given message.
    FailAfter(Duration, String),
    /// Panic while polling the future.
    Panic(String),
    /// Panic while building the future (before anything is awaited).
    PanicOnCall(String),
    /// Never settle.
    Hang,
}

#[derive(Debug, Default)]
struct ProbeState {
    started: Vec<String>,
    finished: Vec<String>,
    active: usize,
    max_active: usize,
}

/// Shared record of which initializers ran, in which order, and how many
/// were running at once.
#[derive(Debug, Default, Clone)]
pub struct Probe {
    inner: Arc<Mutex<ProbeState>>,
}

impl Probe {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ProbeState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Ids in the order their initializers started running.
    pub fn started(&self) -> Vec<String> {
        self.lock().started.clone()
    }

    /// Ids in the order their initializers stopped (settled or were dropped).
    pub fn finished(&self) -> Vec<String> {
        self.lock().finished.clone()
    }

    /// Highest number of initializers running at the same time.
    pub fn max_active(&self) -> usize {
        self.lock().max_active
    }

    fn enter(&self, id: &str) -> ActiveGuard {
        let mut state = self.lock();
        state.started.push(id.to_string());
        state.active += 1;
        state.max_active = state.max_active.max(state.active);
        ActiveGuard {
            probe: self.clone(),
            id: id.to_string(),
        }
    }
}

/// Decrements the active count when the initializer future completes or is
/// dropped (e.g. after a timeout).
struct ActiveGuard {
    probe: Probe,
    id: String,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let mut state = self.probe.lock();
        state.active = state.active.saturating_sub(1);
        state.finished.push(self.id.clone());
    }
}

/// Initializer that follows a [`Script`] and reports to a [`Probe`].
#[derive(Debug, Clone)]
pub struct ScriptedInitializer {
    id: String,
    script: Script,
    probe: Probe,
}

impl ScriptedInitializer {
    pub fn new(id: &str, script: Script, probe: Probe) -> Self {
        Self {
            id: id.to_string(),
            script,
            probe,
        }
    }
}

impl Initializer for ScriptedInitializer {
    fn initialize(&self) -> InitFuture {
        if let Script::PanicOnCall(message) = &self.script {
            panic!("{message}");
        }

        let id = self.id.clone();
        let script = self.script.clone();
        let probe = self.probe.clone();

        Box::pin(async move {
            let _guard = probe.enter(&id);
            match script {
                Script::Succeed => Ok(()),
                Script::SucceedAfter(d) => {
                    tokio::time::sleep(d).await;
                    Ok(())
                }
                Script::Fail(message) => Err(anyhow!(message)),
                Script::FailAfter(d, message) => {
                    tokio::time::sleep(d).await;
                    Err(anyhow!(message))
                }
                Script::Panic(message) => panic!("{message}"),
                Script::PanicOnCall(_) => unreachable!("handled before the future is built"),
                Script::Hang => {
                    std::future::pending::<()>().await;
                    Ok(())
                }
            }
        })
    }
}
