// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::component::Component;
use crate::errors::{BootError, Result};
use crate::types::{ComponentId, ComponentStatus};

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone)]
struct DagNode {
    /// Direct dependencies: components that must be `Ready` before this one
    /// may start.
    deps: Vec<ComponentId>,
    /// Direct dependents: components that list this one as a dependency.
    dependents: Vec<ComponentId>,
}

/// DFS marks for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Immutable dependency graph over the components of one run.
///
/// Dependencies naming a component outside the run are kept as-is: they can
/// never become `Ready`, which the scheduler reports as an unresolvable
/// dependency rather than silently dropping the edge.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Component ids in registration order.
    order: Vec<ComponentId>,
    nodes: HashMap<ComponentId, DagNode>,
}

impl DependencyGraph {
    /// Build the graph and reject cycles.
    ///
    /// Fails with [`BootError::InvalidDefinition`] on duplicate ids and with
    /// [`BootError::CyclicDependency`] if any cycle exists. The reported cycle
    /// is the first one met by a depth-first walk that visits components in
    /// input order and dependencies in declared order.
    pub fn build<'a, I>(components: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Component>,
    {
        let mut order: Vec<ComponentId> = Vec::new();
        let mut nodes: HashMap<ComponentId, DagNode> = HashMap::new();

        // First pass: create nodes with their dependency lists.
        for component in components {
            if nodes.contains_key(component.id()) {
                return Err(BootError::InvalidDefinition(format!(
                    "duplicate component id '{}'",
                    component.id()
                )));
            }
            order.push(component.id().to_string());
            nodes.insert(
                component.id().to_string(),
                DagNode {
                    deps: component.dependencies().to_vec(),
                    dependents: Vec::new(),
                },
            );
        }

        // Second pass: populate dependents, in registration order.
        for name in &order {
            let deps = nodes
                .get(name)
                .map(|n| n.deps.clone())
                .unwrap_or_default();

            for dep in deps {
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(name.clone());
                }
            }
        }

        let graph = Self { order, nodes };

        if let Some(cycle) = graph.find_cycle() {
            return Err(BootError::CyclicDependency { cycle });
        }

        Ok(graph)
    }

    /// All component ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Immediate dependencies of a component.
    pub fn dependencies_of(&self, id: &str) -> &[ComponentId] {
        self.nodes
            .get(id)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a component.
    pub fn dependents_of(&self, id: &str) -> &[ComponentId] {
        self.nodes
            .get(id)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Dependencies of `id` that are not currently `Ready`, in declared order.
    ///
    /// `status_of` returns `None` for ids it doesn't know; those count as
    /// unresolved.
    pub fn unresolved_dependencies<F>(&self, id: &str, status_of: F) -> Vec<ComponentId>
    where
        F: Fn(&str) -> Option<ComponentStatus>,
    {
        self.dependencies_of(id)
            .iter()
            .filter(|dep| status_of(dep.as_str()) != Some(ComponentStatus::Ready))
            .cloned()
            .collect()
    }

    /// A component may start exactly when it is `Waiting` and nothing it
    /// depends on is unresolved.
    pub fn is_ready_to_start<F>(&self, id: &str, status_of: F) -> bool
    where
        F: Fn(&str) -> Option<ComponentStatus>,
    {
        status_of(id) == Some(ComponentStatus::Waiting)
            && self.unresolved_dependencies(id, &status_of).is_empty()
    }

    /// One valid initialization order (dependencies first).
    ///
    /// Dependencies on components outside the graph are ignored here.
    pub fn boot_order(&self) -> Result<Vec<ComponentId>> {
        let index: HashMap<&str, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        // Edge direction: dep -> dependent.
        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
        for i in 0..self.order.len() {
            graph.add_node(i);
        }
        for (i, id) in self.order.iter().enumerate() {
            for dep in self.dependencies_of(id) {
                if let Some(&d) = index.get(dep.as_str()) {
                    graph.add_edge(d, i, ());
                }
            }
        }

        match toposort(&graph, None) {
            Ok(sorted) => Ok(sorted.into_iter().map(|i| self.order[i].clone()).collect()),
            Err(cycle) => Err(BootError::CyclicDependency {
                cycle: vec![self.order[cycle.node_id()].clone()],
            }),
        }
    }

    fn find_cycle(&self) -> Option<Vec<ComponentId>> {
        let mut marks: HashMap<&str, Mark> = self
            .order
            .iter()
            .map(|id| (id.as_str(), Mark::White))
            .collect();
        let mut path: Vec<&str> = Vec::new();

        for id in &self.order {
            if marks.get(id.as_str()) == Some(&Mark::White) {
                if let Some(cycle) = self.visit(id, &mut marks, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }

    fn visit<'a>(
        &'a self,
        id: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<ComponentId>> {
        marks.insert(id, Mark::Gray);
        path.push(id);

        for dep in self.dependencies_of(id) {
            match marks.get(dep.as_str()) {
                Some(Mark::White) => {
                    if let Some(cycle) = self.visit(dep, marks, path) {
                        return Some(cycle);
                    }
                }
                Some(Mark::Gray) => {
                    // Back edge: the cycle is the path from `dep` to here.
                    let start = path.iter().position(|p| *p == dep.as_str()).unwrap_or(0);
                    return Some(path[start..].iter().map(|s| s.to_string()).collect());
                }
                // Finished, or not part of this graph.
                Some(Mark::Black) | None => {}
            }
        }

        path.pop();
        marks.insert(id, Mark::Black);
        None
    }
}
