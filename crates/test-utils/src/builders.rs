#![allow(dead_code)]

use bootdag::component::{Component, ComponentRegistry};

use crate::scripted::{Probe, Script, ScriptedInitializer};

/// Builder for `ComponentRegistry` to simplify test setup.
///
/// Every component gets a [`ScriptedInitializer`] wired to the builder's
/// shared [`Probe`].
pub struct RegistryBuilder {
    registry: ComponentRegistry,
    probe: Probe,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: ComponentRegistry::new(),
            probe: Probe::new(),
        }
    }

    /// Register `id` with the given dependencies and script.
    pub fn component(mut self, id: &str, deps: &[&str], script: Script) -> Self {
        let component = Component::new(id, id, format!("test component {id}"), deps.iter().copied())
            .expect("valid test component");
        let init = ScriptedInitializer::new(id, script, self.probe.clone());
        self.registry
            .register(component, init)
            .expect("unique test component id");
        self
    }

    /// Register `id` with an initializer that succeeds immediately.
    pub fn instant(self, id: &str, deps: &[&str]) -> Self {
        self.component(id, deps, Script::Succeed)
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }

    pub fn build(self) -> (ComponentRegistry, Probe) {
        (self.registry, self.probe)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The diamond used throughout the tests: `A`; `B`, `C` after `A`; `D` after
/// `B` and `C`.
pub fn diamond(a: Script) -> RegistryBuilder {
    RegistryBuilder::new()
        .component("A", &[], a)
        .instant("B", &["A"])
        .instant("C", &["A"])
        .instant("D", &["B", "C"])
}
