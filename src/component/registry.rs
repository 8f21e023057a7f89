// src/component/registry.rs

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::component::model::Component;
use crate::errors::{BootError, Result};
use crate::exec::Initializer;

/// A component plus the initializer that performs its setup work.
#[derive(Clone)]
pub struct RegisteredComponent {
    pub component: Component,
    pub initializer: Arc<dyn Initializer>,
}

impl std::fmt::Debug for RegisteredComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredComponent")
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of components available to a run.
///
/// Registration order is kept: it is the tie-break order the scheduler uses
/// when several components become ready at the same time.
#[derive(Debug, Default, Clone)]
pub struct ComponentRegistry {
    entries: Vec<RegisteredComponent>,
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component with its initializer.
    ///
    /// Fails with [`BootError::InvalidDefinition`] if the id is already taken.
    pub fn register<I>(&mut self, component: Component, initializer: I) -> Result<()>
    where
        I: Initializer + 'static,
    {
        self.register_shared(component, Arc::new(initializer))
    }

    /// Same as [`register`](Self::register) for an already shared initializer.
    pub fn register_shared(
        &mut self,
        component: Component,
        initializer: Arc<dyn Initializer>,
    ) -> Result<()> {
        if self.index.contains_key(component.id()) {
            return Err(BootError::InvalidDefinition(format!(
                "duplicate component id '{}'",
                component.id()
            )));
        }

        debug!(
            component = %component.id(),
            deps = ?component.dependencies(),
            "registered component"
        );

        self.index
            .insert(component.id().to_string(), self.entries.len());
        self.entries.push(RegisteredComponent {
            component,
            initializer,
        });
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredComponent> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Components in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredComponent> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.component.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Components selected for a run, in registration order.
    ///
    /// An empty `include` list selects everything. Ids in `include` that are
    /// not registered are reported as a configuration error.
    pub fn select(&self, include: &[String]) -> Result<Vec<RegisteredComponent>> {
        if include.is_empty() {
            return Ok(self.entries.clone());
        }

        if let Some(missing) = include.iter().find(|id| !self.contains(id)) {
            return Err(BootError::ConfigError(format!(
                "included component '{missing}' is not registered"
            )));
        }

        Ok(self
            .entries
            .iter()
            .filter(|e| include.iter().any(|id| id == e.component.id()))
            .cloned()
            .collect())
    }
}
