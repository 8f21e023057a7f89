// src/component/mod.rs

//! Component model.
//!
//! - [`model`] defines a single unit of initialization and its status record.
//! - [`registry`] collects components (and their initializers) before a run,
//!   in registration order.

pub mod model;
pub mod registry;

pub use model::Component;
pub use registry::{ComponentRegistry, RegisteredComponent};
