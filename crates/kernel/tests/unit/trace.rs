//! # Trace Loading Tests
//!
//! File traces split on any whitespace; in-memory traces serve tests and embedding.

use std::fs;

use kernsim_core::common::{PageId, ProcessId, TraceError};
use kernsim_core::sim::trace::{TRACE_EXTENSION, VecTraceSource};
use kernsim_core::sim::{FileTraceLoader, MemoryTraceLoader, TraceLoader, TraceSource};
use pretty_assertions::assert_eq;

fn drain(source: &mut dyn TraceSource) -> Vec<String> {
    let mut tokens = Vec::new();
    while let Some(page) = source.next_token().unwrap() {
        tokens.push(page.as_str().to_owned());
    }
    tokens
}

#[test]
fn test_file_trace_splits_on_any_whitespace() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("editor.mem"), "a b\n\n  c\td  \r\ne\n").unwrap();

    let mut loader = FileTraceLoader::new(dir.path());
    let mut source = loader.open(&ProcessId::new("editor")).unwrap();

    assert_eq!(drain(source.as_mut()), vec!["a", "b", "c", "d", "e"]);
    assert!(source.next_token().unwrap().is_none());
}

#[test]
fn test_file_trace_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("idle.mem"), "\n  \n").unwrap();

    let mut loader = FileTraceLoader::new(dir.path());
    let mut source = loader.open(&ProcessId::new("idle")).unwrap();

    assert!(source.next_token().unwrap().is_none());
}

#[test]
fn test_file_trace_path_keeps_dotted_names() {
    let loader = FileTraceLoader::new("/traces");
    assert_eq!(TRACE_EXTENSION, "mem");
    assert_eq!(
        loader.path_for(&ProcessId::new("build.v2")),
        std::path::PathBuf::from("/traces/build.v2.mem")
    );
}

#[test]
fn test_file_trace_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut loader = FileTraceLoader::new(dir.path());

    match loader.open(&ProcessId::new("ghost")) {
        Err(TraceError::Open { process, path, .. }) => {
            assert_eq!(process.as_str(), "ghost");
            assert_eq!(path, dir.path().join("ghost.mem"));
        }
        other => panic!("expected Open error, got {other:?}"),
    }
}

#[test]
fn test_file_trace_reopens_from_start() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("p.mem"), "x y").unwrap();
    let mut loader = FileTraceLoader::new(dir.path());

    let mut first = loader.open(&ProcessId::new("p")).unwrap();
    let _ = first.next_token().unwrap();
    let mut second = loader.open(&ProcessId::new("p")).unwrap();

    assert_eq!(drain(second.as_mut()), vec!["x", "y"]);
}

#[test]
fn test_memory_loader_serves_registered_traces() {
    let mut loader = MemoryTraceLoader::new()
        .with_trace("a", &["p1", "p2"])
        .with_trace("b", &["q1"]);

    let mut a = loader.open(&ProcessId::new("a")).unwrap();
    let mut b = loader.open(&ProcessId::new("b")).unwrap();

    assert_eq!(drain(a.as_mut()), vec!["p1", "p2"]);
    assert_eq!(drain(b.as_mut()), vec!["q1"]);
}

#[test]
fn test_memory_loader_insert_replaces() {
    let mut loader = MemoryTraceLoader::new().with_trace("a", &["old"]);
    loader.insert(ProcessId::new("a"), vec![PageId::new("new")]);

    let mut a = loader.open(&ProcessId::new("a")).unwrap();
    assert_eq!(drain(a.as_mut()), vec!["new"]);
}

#[test]
fn test_memory_loader_unknown_process() {
    let mut loader = MemoryTraceLoader::new();
    assert!(matches!(
        loader.open(&ProcessId::new("nobody")),
        Err(TraceError::Missing(pid)) if pid.as_str() == "nobody"
    ));
}

#[test]
fn test_vec_source_yields_in_order() {
    let mut source = VecTraceSource::new(["x", "y", "x"].map(PageId::new));
    assert_eq!(drain(&mut source), vec!["x", "y", "x"]);
}
