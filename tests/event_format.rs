// tests/event_format.rs
//
// Shape of what `--json` prints and what subscribers receive.

use std::str::FromStr;

use serde_json::{json, Value};

use bootdag::errors::BootError;
use bootdag::events::{BootEvent, RunSummary, StatusChange};
use bootdag::cli::LogLevel;
use bootdag::logging::filter_directives;
use bootdag::types::ComponentStatus;

#[test]
fn status_change_serializes_with_event_tag() {
    let event = BootEvent::StatusChanged(StatusChange {
        component_id: "db".into(),
        previous: ComponentStatus::Initializing,
        current: ComponentStatus::TimedOut,
        at_ms: 120,
        duration_ms: Some(100),
        error: Some("timed out after 100ms".into()),
    });

    let value: Value = serde_json::to_value(&event).unwrap();
    assert_eq!(
        value,
        json!({
            "event": "status_changed",
            "component_id": "db",
            "previous": "initializing",
            "current": "timed_out",
            "at_ms": 120,
            "duration_ms": 100,
            "error": "timed out after 100ms",
        })
    );
}

#[test]
fn optional_fields_are_omitted_when_absent() {
    let event = BootEvent::StatusChanged(StatusChange {
        component_id: "db".into(),
        previous: ComponentStatus::Waiting,
        current: ComponentStatus::Initializing,
        at_ms: 0,
        duration_ms: None,
        error: None,
    });

    let value: Value = serde_json::to_value(&event).unwrap();
    assert!(value.get("duration_ms").is_none());
    assert!(value.get("error").is_none());
}

#[test]
fn summary_serializes_counts() {
    let event = BootEvent::RunCompleted(RunSummary {
        total_duration_ms: 42,
        components: 3,
        ready: 1,
        failed: 1,
        timed_out: 1,
        waiting: 0,
    });

    let value: Value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "run_completed");
    assert_eq!(value["ready"], 1);
    assert_eq!(value["timed_out"], 1);
}

#[test]
fn status_names_round_trip_through_text() {
    for status in [
        ComponentStatus::Waiting,
        ComponentStatus::Initializing,
        ComponentStatus::Ready,
        ComponentStatus::Failed,
        ComponentStatus::TimedOut,
    ] {
        assert_eq!(ComponentStatus::from_str(status.as_str()), Ok(status));
    }
    assert_eq!(ComponentStatus::from_str(" READY "), Ok(ComponentStatus::Ready));
    assert!(ComponentStatus::from_str("booting").is_err());
    assert_eq!(ComponentStatus::default(), ComponentStatus::Waiting);
}

#[test]
fn failure_statuses_are_terminal() {
    assert!(ComponentStatus::TimedOut.is_failure());
    assert!(ComponentStatus::TimedOut.is_terminal());
    assert!(ComponentStatus::Ready.is_terminal());
    assert!(!ComponentStatus::Ready.is_failure());
    assert!(!ComponentStatus::Initializing.is_terminal());
}

#[test]
fn error_messages_name_the_offenders() {
    let cycle = BootError::CyclicDependency {
        cycle: vec!["P".into(), "Q".into()],
    };
    assert_eq!(cycle.to_string(), "Cyclic dependency: P -> Q");

    let stalled = BootError::UnresolvableDependency {
        waiting: vec!["api".into(), "worker".into()],
    };
    assert_eq!(
        stalled.to_string(),
        "Unresolvable dependency; still waiting: api, worker"
    );

    let timeout = BootError::ComponentTimeout {
        id: "db".into(),
        timeout_ms: 100,
    };
    assert_eq!(timeout.to_string(), "Component 'db' timed out after 100ms");
}

#[test]
fn log_flag_scopes_the_level_to_bootdag() {
    assert_eq!(
        filter_directives(Some(LogLevel::Debug), Some("trace")),
        "warn,bootdag=debug"
    );
}

#[test]
fn log_env_is_taken_as_filter_directives() {
    assert_eq!(
        filter_directives(None, Some(" bootdag::dag=trace,tokio=warn ")),
        "bootdag::dag=trace,tokio=warn"
    );
    assert_eq!(filter_directives(None, Some("   ")), "warn,bootdag=info");
    assert_eq!(filter_directives(None, None), "warn,bootdag=info");
}
