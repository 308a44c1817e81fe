//! Common test utilities for integration tests
//!
//! Builds gateways and executors over the scripted mock transport.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use tablegate::adapters::{MockReply, MockTransport};
use tablegate::domain::models::{DefaultsConfig, FetchConfig};
use tablegate::domain::ports::InMemoryCheckpointStore;
use tablegate::{FieldMapper, OperationExecutor, QueryBuilder, ResourceGateway};

pub fn gateway(mock: &MockTransport) -> ResourceGateway {
    ResourceGateway::new(Arc::new(mock.clone()), QueryBuilder::default())
}

pub struct Harness {
    pub mock: MockTransport,
    pub store: Arc<InMemoryCheckpointStore>,
    pub executor: OperationExecutor,
}

pub fn harness(fetch: FetchConfig) -> Harness {
    let mock = MockTransport::new();
    let store = Arc::new(InMemoryCheckpointStore::new());
    let executor = OperationExecutor::new(
        gateway(&mock),
        FieldMapper::default(),
        DefaultsConfig::default(),
        fetch,
        store.clone(),
    );
    Harness {
        mock,
        store,
        executor,
    }
}

pub fn ok(body: Value) -> MockReply {
    MockReply::json(200, &body)
}

pub fn no_record_found() -> MockReply {
    MockReply::json(
        404,
        &json!({"error": {"message": "No Record found", "detail": "Record doesn't exist or ACL restricts the record retrieval"}}),
    )
}

/// An incident row as the table API returns it.
pub fn incident(sys_id: &str, number: &str, opened_at: &str) -> Value {
    json!({
        "sys_id": sys_id,
        "number": number,
        "short_description": "Printer on fire",
        "priority": "1",
        "state": "2",
        "severity": "2",
        "impact": "1",
        "urgency": "3",
        "opened_at": opened_at,
        "sys_created_on": opened_at,
        "opened_by": {"link": "https://dev.example.com/api/now/table/sys_user/u1", "value": "u1"},
        "assigned_to": "",
        "active": "true"
    })
}

/// Initialize a test subscriber; repeated calls are ignored.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
