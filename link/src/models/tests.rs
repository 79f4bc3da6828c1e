use serde_json::json;

use super::*;

// ==================== ExecutionState Tests ====================

#[test]
fn test_execution_state_default_is_not_started() {
    assert_eq!(ExecutionState::default(), ExecutionState::NotStarted);
}

#[test]
fn test_server_tags_in_progress_map_to_running() {
    for tag in [
        "QUEUED",
        "WAITING_FOR_RESOURCES",
        "DISPATCHING",
        "PLANNING",
        "STARTING",
        "RUNNING",
        "BLOCKED",
        "FINISHING",
    ] {
        assert_eq!(
            ExecutionState::from_server_tag(tag),
            ExecutionState::Running,
            "tag {} should be Running",
            tag
        );
    }
}

#[test]
fn test_server_tags_terminal() {
    assert_eq!(ExecutionState::from_server_tag("FINISHED"), ExecutionState::Finished);
    assert_eq!(ExecutionState::from_server_tag("finished"), ExecutionState::Finished);
    assert_eq!(ExecutionState::from_server_tag("FAILED"), ExecutionState::Failed);
    assert_eq!(ExecutionState::from_server_tag("CANCELED"), ExecutionState::Failed);
    // Unknown tags are engine-defined failure states
    assert_eq!(ExecutionState::from_server_tag("EXPLODED"), ExecutionState::Failed);
}

#[test]
fn test_execution_state_transitions_are_monotonic() {
    use ExecutionState::*;

    assert!(NotStarted.can_transition_to(Running));
    assert!(NotStarted.can_transition_to(Finished));
    assert!(Running.can_transition_to(Running));
    assert!(Running.can_transition_to(Finished));
    assert!(Running.can_transition_to(Failed));

    assert!(!Running.can_transition_to(NotStarted));
    assert!(!Finished.can_transition_to(Running));
    assert!(!Finished.can_transition_to(Failed));
    assert!(!Failed.can_transition_to(Finished));
    assert!(!Failed.can_transition_to(NotStarted));

    assert!(Finished.is_terminal());
    assert!(Failed.is_terminal());
    assert!(!Running.is_terminal());
}

// ==================== StatusEnvelope Tests ====================

#[test]
fn test_decode_full_envelope() {
    let body = json!({
        "id": "q1",
        "infoUri": "http://engine/info/q1",
        "nextUri": "http://engine/v1/statement/q1/1",
        "partialCancelUri": "http://engine/v1/stage/q1.0",
        "columns": [{"name": "a", "type": "bigint"}],
        "data": [[1], [2]],
        "stats": {"state": "RUNNING", "totalSplits": 4, "completedSplits": 1},
        "somethingNew": {"ignored": true}
    });
    let envelope = StatusEnvelope::decode(body.to_string().as_bytes()).unwrap();

    assert_eq!(envelope.id.as_deref(), Some("q1"));
    assert_eq!(envelope.next_uri.as_deref(), Some("http://engine/v1/statement/q1/1"));
    assert_eq!(envelope.info_uri.as_deref(), Some("http://engine/info/q1"));
    assert_eq!(envelope.partial_cancel_uri.as_deref(), Some("http://engine/v1/stage/q1.0"));
    assert_eq!(envelope.state_tag(), Some("RUNNING"));
    assert_eq!(envelope.batch_len(), 2);
    assert_eq!(
        envelope.columns.unwrap(),
        vec![Column {
            name: "a".into(),
            data_type: "bigint".into()
        }]
    );
    assert_eq!(envelope.stats.unwrap().progress_percentage(), Some(25.0));
}

#[test]
fn test_decode_minimal_envelope() {
    let envelope = StatusEnvelope::decode(b"{}").unwrap();
    assert_eq!(envelope, StatusEnvelope::default());
    assert_eq!(envelope.state_tag(), None);
    assert_eq!(envelope.batch_len(), 0);
}

#[test]
fn test_decode_accepts_lowercase_cancel_uri_spelling() {
    let envelope = StatusEnvelope::decode(br#"{"partialcancelUri": "http://engine/cancel"}"#).unwrap();
    assert_eq!(envelope.partial_cancel_uri.as_deref(), Some("http://engine/cancel"));
}

#[test]
fn test_decode_stats_without_state() {
    let envelope = StatusEnvelope::decode(br#"{"stats": {"nodes": 3}}"#).unwrap();
    let stats = envelope.stats.as_ref().unwrap();
    assert_eq!(stats.nodes, 3);
    assert_eq!(envelope.state_tag(), None);
    assert_eq!(stats.progress_percentage(), None);
}

#[test]
fn test_decode_error_detail() {
    let body = json!({
        "stats": {"state": "FAILED"},
        "error": {
            "message": "line 1:8: Column 'x' cannot be resolved",
            "errorCode": 47,
            "errorName": "COLUMN_NOT_FOUND",
            "errorType": "USER_ERROR"
        }
    });
    let envelope = StatusEnvelope::decode(body.to_string().as_bytes()).unwrap();
    let error = envelope.error.unwrap();
    assert_eq!(error.error_code, Some(47));
    assert_eq!(
        error.to_string(),
        "COLUMN_NOT_FOUND: line 1:8: Column 'x' cannot be resolved"
    );
}

#[test]
fn test_decode_rejects_non_json() {
    assert!(StatusEnvelope::decode(b"<html>bad gateway</html>").is_err());
}

// ==================== QueryResults Tests ====================

#[test]
fn test_query_results_row_as_map() {
    let results = QueryResults {
        columns: vec![
            Column {
                name: "id".into(),
                data_type: "bigint".into(),
            },
            Column {
                name: "name".into(),
                data_type: "varchar".into(),
            },
        ],
        rows: vec![vec![json!(1), json!("alice")], vec![json!(2), json!("bob")]],
        ..Default::default()
    };

    assert_eq!(results.column_names(), vec!["id", "name"]);
    assert_eq!(results.row_count(), 2);
    let row = results.row_as_map(1).unwrap();
    assert_eq!(row.get("name"), Some(&json!("bob")));
    assert!(results.row_as_map(2).is_none());
}

// ==================== HttpVersion Tests ====================

#[test]
fn test_http_version_parse_lenient() {
    assert_eq!(HttpVersion::parse_lenient("http1"), HttpVersion::Http1);
    assert_eq!(HttpVersion::parse_lenient("HTTP/2"), HttpVersion::Http2);
    assert_eq!(HttpVersion::parse_lenient("whatever"), HttpVersion::Auto);
    assert_eq!(HttpVersion::default(), HttpVersion::Auto);
}
