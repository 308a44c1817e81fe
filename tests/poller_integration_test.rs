mod common;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::{gateway, incident, no_record_found, ok, setup_test_logging};
use serde_json::json;
use tablegate::adapters::MockTransport;
use tablegate::domain::models::{FetchConfig, LookbackWindow, ResourceKind};
use tablegate::domain::ports::{CheckpointStore, InMemoryCheckpointStore};
use tablegate::services::{IncrementalPoller, PollSettings};
use tablegate::{Checkpoint, GatewayError};

fn settings(page_size: u32) -> PollSettings {
    PollSettings {
        kind: ResourceKind::from_table("incident"),
        base_filter: None,
        page_size,
        timestamp_field: "opened_at".to_string(),
        lookback: LookbackWindow::default(),
        get_attachments: false,
    }
}

fn poller(
    mock: &MockTransport,
    store: &Arc<InMemoryCheckpointStore>,
    settings: PollSettings,
) -> IncrementalPoller {
    IncrementalPoller::new(gateway(mock), store.clone(), settings)
}

#[tokio::test]
async fn test_checkpoint_advances_to_last_scanned() {
    setup_test_logging();
    let mock = MockTransport::new();
    let store = Arc::new(InMemoryCheckpointStore::with_checkpoint(Checkpoint::new(
        "2024-01-15 10:00:00",
    )));
    mock.push(ok(json!({"result": [
        incident("s0", "INC0000100", "2024-01-15 09:59:00"),
        incident("s1", "INC0000101", "2024-01-15 10:05:00"),
        incident("s2", "INC0000102", "2024-01-15 10:10:00"),
    ]})))
    .await;

    let batch = poller(&mock, &store, settings(10)).poll_once().await.unwrap();

    let names: Vec<&str> = batch.events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Incident INC0000101", "Incident INC0000102"]);
    assert_eq!(batch.checkpoint, Checkpoint::new("2024-01-15 10:10:00"));
    assert_eq!(batch.scanned, 3);
    assert_eq!(
        store.current().await,
        Some(Checkpoint::new("2024-01-15 10:10:00"))
    );

    let request = mock.last_request().await.unwrap();
    assert_eq!(request.path, "table/incident");
    assert_eq!(
        request.param("sysparm_query"),
        Some("ORDERBYopened_at^opened_at>2024-01-15 10:00:00")
    );
    assert_eq!(request.param("sysparm_limit"), Some("10"));
    assert_eq!(request.param("sysparm_offset"), Some("0"));
}

#[tokio::test]
async fn test_event_carries_labels_and_severity() {
    let mock = MockTransport::new();
    let store = Arc::new(InMemoryCheckpointStore::with_checkpoint(Checkpoint::new(
        "2024-01-15 10:00:00",
    )));
    mock.push(ok(json!({"result": [incident("s1", "INC0000101", "2024-01-15 10:05:00")]})))
        .await;

    let batch = poller(&mock, &store, settings(10)).poll_once().await.unwrap();
    let event = &batch.events[0];

    assert_eq!(event.severity, 2);
    assert!(event
        .labels
        .iter()
        .any(|l| l.label_type == "number" && l.value == "INC0000101"));
    assert!(event
        .labels
        .iter()
        .any(|l| l.label_type == "opened_by" && l.value.contains("\"value\":\"u1\"")));
    assert_eq!(event.raw["sys_id"], json!("s1"));
}

#[tokio::test]
async fn test_first_run_seeds_from_lookback_and_saves_on_empty_page() {
    let mock = MockTransport::new();
    let store = Arc::new(InMemoryCheckpointStore::new());
    mock.push(ok(json!({"result": []}))).await;

    let mut settings = settings(5);
    settings.lookback = LookbackWindow::parse("2 hours").unwrap();
    settings.base_filter = Some("active=true".to_string());
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let batch = poller(&mock, &store, settings).poll_at(now).await.unwrap();

    assert!(batch.events.is_empty());
    assert_eq!(batch.scanned, 0);
    assert_eq!(batch.checkpoint, Checkpoint::new("2024-03-01 10:00:00"));
    assert_eq!(
        store.current().await,
        Some(Checkpoint::new("2024-03-01 10:00:00"))
    );
    assert_eq!(
        mock.last_request().await.unwrap().param("sysparm_query"),
        Some("active=true^ORDERBYopened_at^opened_at>2024-03-01 10:00:00")
    );
}

#[tokio::test]
async fn test_empty_page_keeps_stored_checkpoint() {
    for reply in [ok(json!({"result": []})), no_record_found()] {
        let mock = MockTransport::new();
        let store = Arc::new(InMemoryCheckpointStore::with_checkpoint(Checkpoint::new(
            "2024-01-15 10:00:00",
        )));
        mock.push(reply).await;

        let batch = poller(&mock, &store, settings(10)).poll_once().await.unwrap();

        assert!(batch.events.is_empty());
        assert_eq!(batch.scanned, 0);
        assert_eq!(batch.checkpoint, Checkpoint::new("2024-01-15 10:00:00"));
        assert_eq!(
            store.current().await,
            Some(Checkpoint::new("2024-01-15 10:00:00"))
        );
    }
}

#[tokio::test]
async fn test_missing_timestamp_field_aborts_cycle() {
    let mock = MockTransport::new();
    let store = Arc::new(InMemoryCheckpointStore::with_checkpoint(Checkpoint::new(
        "2024-01-15 10:00:00",
    )));
    mock.push(ok(json!({"result": [{"sys_id": "s1", "number": "INC1"}]})))
        .await;

    let mut settings = settings(10);
    settings.timestamp_field = "u_detected_at".to_string();
    let err = poller(&mock, &store, settings).poll_once().await.unwrap_err();

    match err {
        GatewayError::ConfigurationError(msg) => {
            assert_eq!(msg, "The timestamp field [u_detected_at] does not exist in the ticket");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        store.current().await,
        Some(Checkpoint::new("2024-01-15 10:00:00"))
    );
}

#[tokio::test]
async fn test_attachment_failure_aborts_cycle_without_saving() {
    let mock = MockTransport::new();
    let store = Arc::new(InMemoryCheckpointStore::with_checkpoint(Checkpoint::new(
        "2024-01-15 10:00:00",
    )));
    mock.push(ok(json!({"result": [incident("s1", "INC0000101", "2024-01-15 10:05:00")]})))
        .await;
    mock.push(ok(json!({"result": [
        {"download_link": "https://dev.example.com/api/now/attachment/a1/file", "file_name": "dump.bin"}
    ]})))
    .await;
    mock.fail_download("https://dev.example.com/api/now/attachment/a1/file", "403 Forbidden")
        .await;

    let mut settings = settings(10);
    settings.get_attachments = true;
    let err = poller(&mock, &store, settings).poll_once().await.unwrap_err();

    assert!(matches!(err, GatewayError::RemoteError(ref m) if m.contains("dump.bin")));
    assert_eq!(
        store.current().await,
        Some(Checkpoint::new("2024-01-15 10:00:00"))
    );
}

#[tokio::test]
async fn test_remote_failure_leaves_checkpoint() {
    let mock = MockTransport::new();
    let store = Arc::new(InMemoryCheckpointStore::with_checkpoint(Checkpoint::new(
        "2024-01-15 10:00:00",
    )));
    mock.push(tablegate::adapters::MockReply::failure("connection refused"))
        .await;

    let result = poller(&mock, &store, settings(10)).poll_once().await;

    assert!(matches!(result, Err(GatewayError::RemoteError(_))));
    assert_eq!(
        store.current().await,
        Some(Checkpoint::new("2024-01-15 10:00:00"))
    );
}

#[tokio::test]
async fn test_fetch_incidents_operation_uses_fetch_config() {
    let h = common::harness(FetchConfig {
        enabled: true,
        ticket_type: "problem".to_string(),
        fetch_limit: 3,
        ..Default::default()
    });
    h.store
        .save(&Checkpoint::new("2024-01-15 10:00:00"))
        .await
        .unwrap();
    h.mock
        .push(ok(json!({"result": [incident("p1", "PRB0000001", "2024-01-15 10:01:00")]})))
        .await;

    let outcome = h
        .executor
        .execute(tablegate::Operation::FetchIncidents)
        .await
        .unwrap();

    let tablegate::OperationOutcome::Batch(batch) = outcome else {
        panic!("expected a batch");
    };
    assert_eq!(batch.events[0].name, "Problem PRB0000001");
    let request = h.mock.last_request().await.unwrap();
    assert_eq!(request.path, "table/problem");
    assert_eq!(request.param("sysparm_limit"), Some("3"));
}

#[tokio::test]
async fn test_oversized_page_is_capped() {
    let mock = MockTransport::new();
    let store = Arc::new(InMemoryCheckpointStore::with_checkpoint(Checkpoint::new(
        "2024-01-15 10:00:00",
    )));
    // The server ignores sysparm_limit and returns more rows than asked for.
    mock.push(ok(json!({"result": [
        incident("s1", "INC1", "2024-01-15 10:01:00"),
        incident("s2", "INC2", "2024-01-15 10:02:00"),
        incident("s3", "INC3", "2024-01-15 10:03:00"),
        incident("s4", "INC4", "2024-01-15 10:04:00"),
    ]})))
    .await;

    let batch = poller(&mock, &store, settings(1)).poll_once().await.unwrap();

    assert_eq!(batch.scanned, 2);
    assert_eq!(batch.events.len(), 2);
    assert_eq!(batch.checkpoint, Checkpoint::new("2024-01-15 10:02:00"));
}
