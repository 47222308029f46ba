//! # Workload Tests
//!
//! Parsing, validation against the event-table keying, and submission.

use std::fs;

use kernsim_core::common::{ProcessId, WorkloadError};
use kernsim_core::config::SchedulerConfig;
use kernsim_core::core::sched::{EventKind, RoundRobinScheduler};
use kernsim_core::sim::{ProcessSpec, Workload};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_workload_parses_and_defaults_arrival() {
    let json = r#"{ "processes": [ { "name": "shell" }, { "name": "cc", "arrival": 40 } ] }"#;
    let workload = Workload::from_json(json).unwrap();

    assert_eq!(
        workload.processes,
        vec![ProcessSpec::new("shell", 0), ProcessSpec::new("cc", 40)]
    );
    assert_eq!(workload.len(), 2);
}

#[test]
fn test_workload_rejects_empty() {
    assert!(matches!(
        Workload::from_json(r#"{ "processes": [] }"#),
        Err(WorkloadError::Empty)
    ));
}

#[test]
fn test_workload_rejects_duplicate_names() {
    let workload = Workload::new(vec![ProcessSpec::new("a", 0), ProcessSpec::new("a", 5)]);
    assert!(matches!(
        workload.validate(),
        Err(WorkloadError::DuplicateProcess(pid)) if pid.as_str() == "a"
    ));
}

#[test]
fn test_workload_rejects_shared_arrival_cycle() {
    let workload = Workload::new(vec![
        ProcessSpec::new("a", 3),
        ProcessSpec::new("b", 9),
        ProcessSpec::new("c", 3),
    ]);

    match workload.validate() {
        Err(WorkloadError::ArrivalCollision {
            time,
            first,
            second,
        }) => {
            assert_eq!(time, 3);
            assert_eq!(first, ProcessId::new("a"));
            assert_eq!(second, ProcessId::new("c"));
        }
        other => panic!("expected ArrivalCollision, got {other:?}"),
    }
}

#[rstest]
#[case("")]
#[case("bin/ls")]
#[case("..\\up")]
#[case("two words")]
fn test_workload_rejects_unusable_names(#[case] name: &str) {
    let workload = Workload::new(vec![ProcessSpec::new(name, 0)]);
    assert!(matches!(
        workload.validate(),
        Err(WorkloadError::InvalidName(_))
    ));
}

#[test]
fn test_workload_rejects_malformed_json() {
    assert!(matches!(
        Workload::from_json(r#"{ "processes": [ { "arrival": 1 } ] }"#),
        Err(WorkloadError::Parse(_))
    ));
}

#[test]
fn test_workload_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workload.json");
    fs::write(&path, r#"{ "processes": [ { "name": "solo", "arrival": 2 } ] }"#).unwrap();

    let workload = Workload::from_file(&path).unwrap();
    assert_eq!(workload.processes, vec![ProcessSpec::new("solo", 2)]);

    assert!(matches!(
        Workload::from_file(dir.path().join("missing.json")),
        Err(WorkloadError::Io { .. })
    ));
}

#[test]
fn test_workload_submit_schedules_arrivals() {
    let workload = Workload::new(vec![ProcessSpec::new("a", 0), ProcessSpec::new("b", 12)]);
    let mut scheduler = RoundRobinScheduler::new(&SchedulerConfig::default());

    workload.submit(&mut scheduler);

    assert_eq!(scheduler.events().count(EventKind::ProcessArrival), 2);
    assert!(scheduler.events().contains(0, EventKind::ProcessArrival));
    assert!(scheduler.events().contains(12, EventKind::ProcessArrival));
}
