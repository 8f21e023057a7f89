// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::component::{Component, ComponentRegistry};
use crate::config::model::{BootFile, ComponentSpec, RawBootFile};
use crate::errors::Result;
use crate::exec::SimulatedInitializer;

/// Load a boot definition from a given path and return the raw file.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawBootFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let file: RawBootFile = toml::from_str(&contents)?;

    Ok(file)
}

/// Load a boot definition from path and run basic validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for empty or duplicate ids, self-dependencies, unknown
///   `include` entries and run config sanity.
///
/// Cycle detection happens later, when the run's graph is built.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BootFile> {
    let raw = load_from_path(&path)?;
    let file = BootFile::try_from(raw)?;
    Ok(file)
}

/// Register every component of the file with a simulated initializer, in
/// file order.
pub fn build_registry(file: &BootFile) -> Result<ComponentRegistry> {
    let mut registry = ComponentRegistry::new();

    for spec in &file.component {
        let component = component_from_spec(spec)?;
        registry.register(component, SimulatedInitializer::from_spec(&spec.simulate))?;
    }

    Ok(registry)
}

fn component_from_spec(spec: &ComponentSpec) -> Result<Component> {
    let mut component = Component::new(
        spec.id.clone(),
        spec.display_name(),
        spec.description.clone(),
        spec.after.iter().cloned(),
    )?;

    for child in &spec.children {
        component = component.with_child(component_from_spec(child)?);
    }

    Ok(component)
}
