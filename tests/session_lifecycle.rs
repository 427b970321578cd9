//! Session lifecycle and document well-formedness tests.

use std::borrow::Cow;
use std::path::Path;

use scope_trace::{Measurement, ThreadTag, Timestamp, TraceError, TraceSession};

fn measurement(label: &'static str, start: u64, end: u64, tid: u64) -> Measurement {
    Measurement {
        label: Cow::Borrowed(label),
        start: Timestamp(start),
        end: Timestamp(end),
        thread: ThreadTag(tid),
    }
}

fn parse_events(path: &Path) -> Vec<serde_json::Value> {
    let content = std::fs::read_to_string(path).expect("trace file should exist");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("trace should be JSON");
    parsed["traceEvents"]
        .as_array()
        .expect("traceEvents should be an array")
        .clone()
}

#[test]
fn well_formed_document_matches_record_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("basic.json");
    let session = TraceSession::new();

    session.begin_at("basic", &path).unwrap();
    for i in 0..5 {
        let written = session
            .record(&measurement("region", i * 10, i * 10 + 3, 1))
            .unwrap();
        assert!(written);
    }
    session.end().unwrap();

    let events = parse_events(&path);
    assert_eq!(events.len(), 5);
    for event in &events {
        assert_eq!(event["cat"], "function");
        assert_eq!(event["ph"], "X");
        assert_eq!(event["pid"], 0);
        assert_eq!(event["dur"], 3);
    }
}

#[test]
fn empty_session_produces_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    let session = TraceSession::new();

    session.begin_at("empty", &path).unwrap();
    session.end().unwrap();

    assert_eq!(parse_events(&path).len(), 0);
}

#[test]
fn quote_in_label_becomes_apostrophe_and_stays_parseable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("escape.json");
    let session = TraceSession::new();

    session.begin_at("escape", &path).unwrap();
    session
        .record(&measurement("call \"inner\" path", 0, 1, 1))
        .unwrap();
    session.end().unwrap();

    let events = parse_events(&path);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["name"], "call 'inner' path");
}

#[test]
fn duration_is_end_minus_start_in_micros() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("duration.json");
    let session = TraceSession::new();

    session.begin_at("duration", &path).unwrap();
    session.record(&measurement("r", 1_000, 1_042, 1)).unwrap();
    session.end().unwrap();

    let events = parse_events(&path);
    assert_eq!(events[0]["dur"], 42);
    assert_eq!(events[0]["ts"], 1_000);
}

#[test]
fn end_to_end_reference_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.trace");
    let session = TraceSession::new();

    session.begin_at("T", &path).unwrap();
    session.record(&measurement("a", 100, 110, 1)).unwrap();
    session.record(&measurement("b\"c", 200, 220, 1)).unwrap();
    session.record(&measurement("d", 300, 330, 1)).unwrap();
    session.end().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "{\"otherData\": {},\"traceEvents\":[\
         {\"cat\":\"function\",\"dur\":10,\"name\":\"a\",\"ph\":\"X\",\"pid\":0,\"tid\":1,\"ts\":100},\
         {\"cat\":\"function\",\"dur\":20,\"name\":\"b'c\",\"ph\":\"X\",\"pid\":0,\"tid\":1,\"ts\":200},\
         {\"cat\":\"function\",\"dur\":30,\"name\":\"d\",\"ph\":\"X\",\"pid\":0,\"tid\":1,\"ts\":300}\
         ]}"
    );
    assert_eq!(content.matches("},{").count(), 2);
    assert!(content.ends_with("]}"));
}

#[test]
fn restart_to_new_path_closes_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    let session = TraceSession::new();

    session.begin_at("first", &first).unwrap();
    session.record(&measurement("one", 0, 1, 1)).unwrap();
    // implicit end of the first session
    session.begin_at("second", &second).unwrap();
    session.record(&measurement("two", 2, 3, 1)).unwrap();
    session.record(&measurement("three", 4, 5, 1)).unwrap();
    session.end().unwrap();

    let first_events = parse_events(&first);
    assert_eq!(first_events.len(), 1);
    assert_eq!(first_events[0]["name"], "one");

    let second_events = parse_events(&second);
    assert_eq!(second_events.len(), 2);
    assert_eq!(second_events[0]["name"], "two");
}

#[test]
fn restart_at_same_path_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reused.json");
    let session = TraceSession::new();

    session.begin_at("first", &path).unwrap();
    session.record(&measurement("old-a", 0, 1, 1)).unwrap();
    session.record(&measurement("old-b", 2, 3, 1)).unwrap();
    session.begin_at("second", &path).unwrap();
    session.record(&measurement("new", 4, 5, 1)).unwrap();
    session.end().unwrap();

    let events = parse_events(&path);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["name"], "new");
}

#[test]
fn open_failure_leaves_session_inactive() {
    let session = TraceSession::new();
    let err = session
        .begin_at("doomed", "/no/such/directory/trace.json")
        .unwrap_err();
    assert!(matches!(err, TraceError::DestinationOpen { .. }));
    assert!(!session.is_active());

    // subsequent records are discarded, not errors
    let written = session.record(&measurement("late", 0, 1, 1)).unwrap();
    assert!(!written);
}

#[test]
fn open_failure_during_restart_still_closes_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survivor.json");
    let session = TraceSession::new();

    session.begin_at("survivor", &path).unwrap();
    session.record(&measurement("kept", 0, 1, 1)).unwrap();
    session
        .begin_at("doomed", "/no/such/directory/trace.json")
        .unwrap_err();
    assert!(!session.is_active());

    let events = parse_events(&path);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["name"], "kept");
}

#[test]
fn dropping_session_completes_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped.json");

    {
        let session = TraceSession::new();
        session.begin_at("dropped", &path).unwrap();
        session.record(&measurement("r", 0, 1, 1)).unwrap();
    }

    assert_eq!(parse_events(&path).len(), 1);
}

#[test]
fn end_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idempotent.json");
    let session = TraceSession::new();

    session.begin_at("idempotent", &path).unwrap();
    session.end().unwrap();
    session.end().unwrap();
    session.end().unwrap();

    assert_eq!(parse_events(&path).len(), 0);
}
