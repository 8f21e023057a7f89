// tests/dependency_graph.rs

mod common;
use crate::common::init_tracing;

use std::collections::HashMap;

use bootdag::component::Component;
use bootdag::dag::DependencyGraph;
use bootdag::errors::BootError;
use bootdag::types::ComponentStatus;

fn comp(id: &str, deps: &[&str]) -> Component {
    Component::new(id, id, "", deps.iter().copied()).unwrap()
}

fn diamond() -> Vec<Component> {
    vec![
        comp("A", &[]),
        comp("B", &["A"]),
        comp("C", &["A"]),
        comp("D", &["B", "C"]),
    ]
}

#[test]
fn two_component_cycle_is_reported_with_both_ids() {
    init_tracing();

    let components = vec![comp("P", &["Q"]), comp("Q", &["P"])];
    let err = DependencyGraph::build(&components).unwrap_err();

    match err {
        BootError::CyclicDependency { cycle } => {
            assert_eq!(cycle, vec!["P".to_string(), "Q".to_string()]);
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }

    // The graph never got built, so nothing could have left Waiting.
    assert!(components.iter().all(|c| c.status() == ComponentStatus::Waiting));
}

#[test]
fn long_cycle_behind_acyclic_prefix_is_found() {
    let components = vec![
        comp("root", &[]),
        comp("a", &["root", "d"]),
        comp("b", &["a"]),
        comp("c", &["b"]),
        comp("d", &["c"]),
    ];

    let err = DependencyGraph::build(&components).unwrap_err();
    match err {
        BootError::CyclicDependency { cycle } => {
            assert_eq!(cycle, vec!["a", "d", "c", "b"]);
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn shared_dependency_is_not_a_cycle() {
    let graph = DependencyGraph::build(&diamond()).unwrap();
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.ids().collect::<Vec<_>>(), vec!["A", "B", "C", "D"]);
}

#[test]
fn duplicate_ids_are_rejected() {
    let components = vec![comp("A", &[]), comp("A", &[])];
    let err = DependencyGraph::build(&components).unwrap_err();
    assert!(matches!(err, BootError::InvalidDefinition(_)), "got {err:?}");
}

#[test]
fn dependents_are_the_reverse_of_dependencies() {
    let graph = DependencyGraph::build(&diamond()).unwrap();

    assert_eq!(graph.dependents_of("A"), ["B".to_string(), "C".to_string()]);
    assert_eq!(graph.dependents_of("B"), ["D".to_string()]);
    assert!(graph.dependents_of("D").is_empty());
    assert_eq!(graph.dependencies_of("D"), ["B".to_string(), "C".to_string()]);
    assert!(graph.dependencies_of("unknown").is_empty());
}

#[test]
fn unresolved_dependencies_follow_status() {
    let graph = DependencyGraph::build(&diamond()).unwrap();
    let mut statuses: HashMap<&str, ComponentStatus> = HashMap::from([
        ("A", ComponentStatus::Ready),
        ("B", ComponentStatus::Ready),
        ("C", ComponentStatus::Initializing),
        ("D", ComponentStatus::Waiting),
    ]);

    let unresolved = graph.unresolved_dependencies("D", |id| statuses.get(id).copied());
    assert_eq!(unresolved, vec!["C".to_string()]);
    assert!(!graph.is_ready_to_start("D", |id| statuses.get(id).copied()));

    statuses.insert("C", ComponentStatus::Ready);
    assert!(graph.unresolved_dependencies("D", |id| statuses.get(id).copied()).is_empty());
    assert!(graph.is_ready_to_start("D", |id| statuses.get(id).copied()));

    // Not waiting any more: not ready to start even with deps satisfied.
    statuses.insert("D", ComponentStatus::Initializing);
    assert!(!graph.is_ready_to_start("D", |id| statuses.get(id).copied()));
}

#[test]
fn failed_dependency_stays_unresolved() {
    let graph = DependencyGraph::build(&diamond()).unwrap();
    let unresolved = graph.unresolved_dependencies("B", |id| match id {
        "A" => Some(ComponentStatus::Failed),
        _ => Some(ComponentStatus::Waiting),
    });
    assert_eq!(unresolved, vec!["A".to_string()]);
}

#[test]
fn dependency_outside_the_graph_is_kept_and_unresolved() {
    let components = vec![comp("A", &[]), comp("B", &["A", "ghost"])];
    let graph = DependencyGraph::build(&components).unwrap();

    assert!(!graph.contains("ghost"));
    assert_eq!(graph.dependencies_of("B"), ["A".to_string(), "ghost".to_string()]);

    let unresolved = graph.unresolved_dependencies("B", |id| match id {
        "A" => Some(ComponentStatus::Ready),
        "B" => Some(ComponentStatus::Waiting),
        _ => None,
    });
    assert_eq!(unresolved, vec!["ghost".to_string()]);
}

#[test]
fn boot_order_puts_dependencies_first() {
    let components = vec![
        comp("api", &["db", "cache"]),
        comp("cache", &["config"]),
        comp("db", &["config"]),
        comp("config", &[]),
    ];
    let graph = DependencyGraph::build(&components).unwrap();
    let order = graph.boot_order().unwrap();

    assert_eq!(order.len(), 4);
    let pos = |id: &str| order.iter().position(|o| o == id).unwrap();
    assert!(pos("config") < pos("db"));
    assert!(pos("config") < pos("cache"));
    assert!(pos("db") < pos("api"));
    assert!(pos("cache") < pos("api"));
}
