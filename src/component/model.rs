// src/component/model.rs

use serde::Serialize;

use crate::errors::{BootError, Result};
use crate::types::{ComponentId, ComponentStatus};

/// One unit of system initialization.
///
/// Identity and dependencies are fixed at creation. Status, error and
/// duration can only be changed from inside the crate (the status tracker
/// is the single writer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    id: ComponentId,
    name: String,
    description: String,
    status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u64>,
    dependencies: Vec<ComponentId>,
    /// Nested sub-components, for presentational grouping only.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Component>,
}

impl Component {
    /// Create a component in `Waiting` status.
    ///
    /// Fails with [`BootError::InvalidDefinition`] if the id is empty or the
    /// component lists itself as a dependency. Repeated dependency ids are
    /// collapsed, keeping the first occurrence.
    pub fn new<I, S>(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        dependencies: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(BootError::InvalidDefinition(
                "component id must not be empty".to_string(),
            ));
        }

        let mut deps: Vec<ComponentId> = Vec::new();
        for dep in dependencies {
            let dep = dep.into();
            if dep == id {
                return Err(BootError::InvalidDefinition(format!(
                    "component '{id}' cannot depend on itself"
                )));
            }
            if dep.trim().is_empty() {
                return Err(BootError::InvalidDefinition(format!(
                    "component '{id}' has an empty dependency id"
                )));
            }
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            description: description.into(),
            status: ComponentStatus::Waiting,
            error: None,
            duration_ms: None,
            dependencies: deps,
            children: Vec::new(),
        })
    }

    /// Attach a presentational child. Children are never scheduled.
    pub fn with_child(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> ComponentStatus {
        self.status
    }

    /// Error message; present only when the status is `Failed` or `TimedOut`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Elapsed initialization time, set once the status is terminal.
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    pub fn dependencies(&self) -> &[ComponentId] {
        &self.dependencies
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }

    pub(crate) fn set_status(&mut self, status: ComponentStatus) {
        self.status = status;
    }

    pub(crate) fn settle(
        &mut self,
        status: ComponentStatus,
        duration_ms: u64,
        error: Option<String>,
    ) {
        self.status = status;
        self.duration_ms = Some(duration_ms);
        self.error = error;
    }
}
