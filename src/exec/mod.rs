// src/exec/mod.rs

//! Initialization execution layer.
//!
//! This module is responsible for actually running a component's setup work
//! and turning whatever happened into a [`Completion`](crate::engine::Completion)
//! for the scheduling loop.
//!
//! - [`initializer`] provides the `Initializer` trait the caller implements
//!   (or satisfies with a closure) for each component.
//! - [`runner`] runs one initializer against its deadline.
//! - [`simulated`] is the initializer used by the CLI for components whose
//!   work is described in the boot definition file.

pub mod initializer;
pub mod runner;
pub mod simulated;

pub use initializer::{InitFuture, Initializer};
pub use runner::run_component;
pub use simulated::SimulatedInitializer;
