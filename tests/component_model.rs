// tests/component_model.rs

mod common;
use crate::common::{init_tracing, RegistryBuilder};

use bootdag::component::{Component, ComponentRegistry};
use bootdag::errors::BootError;
use bootdag::types::ComponentStatus;

#[test]
fn new_component_starts_waiting_without_timing() {
    init_tracing();

    let c = Component::new("db", "Database", "primary store", ["config"]).unwrap();

    assert_eq!(c.id(), "db");
    assert_eq!(c.name(), "Database");
    assert_eq!(c.description(), "primary store");
    assert_eq!(c.status(), ComponentStatus::Waiting);
    assert_eq!(c.error(), None);
    assert_eq!(c.duration_ms(), None);
    assert_eq!(c.dependencies(), ["config".to_string()]);
    assert!(c.children().is_empty());
}

#[test]
fn empty_id_is_invalid() {
    let err = Component::new("  ", "blank", "", Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, BootError::InvalidDefinition(_)), "got {err:?}");
}

#[test]
fn self_dependency_is_invalid() {
    let err = Component::new("cache", "Cache", "", ["db", "cache"]).unwrap_err();
    match err {
        BootError::InvalidDefinition(msg) => assert!(msg.contains("cache"), "{msg}"),
        other => panic!("expected InvalidDefinition, got {other:?}"),
    }
}

#[test]
fn repeated_dependencies_are_collapsed_in_order() {
    let c = Component::new("api", "API", "", ["db", "cache", "db"]).unwrap();
    assert_eq!(c.dependencies(), ["db".to_string(), "cache".to_string()]);
}

#[test]
fn children_are_kept_in_order() {
    let parent = Component::new("net", "Network", "", Vec::<String>::new())
        .unwrap()
        .with_child(Component::new("net.dns", "DNS", "", Vec::<String>::new()).unwrap())
        .with_child(Component::new("net.tls", "TLS", "", Vec::<String>::new()).unwrap());

    let ids: Vec<_> = parent.children().iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec!["net.dns", "net.tls"]);
}

#[test]
fn duplicate_registration_is_invalid() {
    let mut registry = ComponentRegistry::new();
    let first = Component::new("A", "A", "", Vec::<String>::new()).unwrap();
    let again = Component::new("A", "A again", "", Vec::<String>::new()).unwrap();

    registry.register(first, || async { Ok::<(), anyhow::Error>(()) }).unwrap();
    let err = registry.register(again, || async { Ok::<(), anyhow::Error>(()) }).unwrap_err();

    assert!(matches!(err, BootError::InvalidDefinition(_)), "got {err:?}");
    assert_eq!(registry.len(), 1);
}

#[test]
fn registry_keeps_registration_order() {
    let (registry, _probe) = RegistryBuilder::new()
        .instant("zeta", &[])
        .instant("alpha", &[])
        .instant("mid", &["alpha"])
        .build();

    let ids: Vec<_> = registry.ids().collect();
    assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn select_filters_by_include_list_keeping_registration_order() {
    let (registry, _probe) = RegistryBuilder::new()
        .instant("A", &[])
        .instant("B", &[])
        .instant("C", &[])
        .build();

    let all = registry.select(&[]).unwrap();
    assert_eq!(all.len(), 3);

    let some = registry
        .select(&["C".to_string(), "A".to_string()])
        .unwrap();
    let ids: Vec<_> = some.iter().map(|e| e.component.id()).collect();
    assert_eq!(ids, vec!["A", "C"]);

    let err = registry.select(&["nope".to_string()]).unwrap_err();
    assert!(matches!(err, BootError::ConfigError(_)), "got {err:?}");
}
