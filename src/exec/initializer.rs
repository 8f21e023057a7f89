// src/exec/initializer.rs

//! Pluggable initialization callback.
//!
//! The engine treats a component's setup work as opaque: it calls
//! [`Initializer::initialize`] once, at dispatch time, and awaits the returned
//! future against the component's deadline.
//!
//! - Production callers implement the trait on their own types, or just
//!   register an async closure (see the blanket impl below).
//! - Tests provide scripted initializers that sleep, fail or panic.

use std::future::Future;
use std::pin::Pin;

/// Future returned by an initializer. `Err` marks the component `Failed`
/// with the error's message.
pub type InitFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// Performs the setup work for one component.
///
/// Implementations must eventually settle or be subject to the run timeout.
/// A panic, either while building the future or while polling it, is caught
/// by the engine and recorded as a failure.
pub trait Initializer: Send + Sync {
    fn initialize(&self) -> InitFuture;
}

impl<F, Fut> Initializer for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    fn initialize(&self) -> InitFuture {
        Box::pin((self)())
    }
}
