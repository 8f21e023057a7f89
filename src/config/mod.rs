// src/config/mod.rs

//! Configuration for bootdag.
//!
//! Responsibilities:
//! - Define the run configuration value and the TOML boot definition
//!   (`model.rs`).
//! - Load a boot definition from disk and turn it into a component registry
//!   (`loader.rs`).
//! - Validate basic invariants before anything runs (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{build_registry, load_and_validate, load_from_path};
pub use model::{BootFile, ComponentSpec, RawBootFile, RunConfig, SimulateSpec};
