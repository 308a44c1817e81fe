mod common;

use common::{gateway, ok};
use serde_json::json;
use tablegate::adapters::{MockReply, MockTransport};
use tablegate::domain::models::FetchConfig;
use tablegate::{ConnectivityProbe, GatewayError};

fn fetch(enabled: bool) -> FetchConfig {
    FetchConfig {
        enabled,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_probe_passes_with_watch_field_present() {
    let mock = MockTransport::new();
    mock.push(ok(json!({"result": [{"sys_id": "a", "opened_at": "2024-01-15 10:00:00"}]})))
        .await;
    let gateway = gateway(&mock);
    let fetch = fetch(true);

    let status = ConnectivityProbe::new(&gateway, &fetch).run().await.unwrap();

    assert_eq!(status, "ok");
    let request = mock.last_request().await.unwrap();
    assert_eq!(request.path, "table/incident");
    assert_eq!(request.param("sysparm_limit"), Some("1"));
}

#[tokio::test]
async fn test_probe_rejects_missing_watch_field_when_fetching() {
    let mock = MockTransport::new();
    mock.push(ok(json!({"result": [{"sys_id": "a"}]}))).await;
    let gateway = gateway(&mock);
    let fetch = fetch(true);

    let err = ConnectivityProbe::new(&gateway, &fetch).run().await.unwrap_err();
    assert!(matches!(err, GatewayError::ConfigurationError(ref m) if m.contains("[opened_at]")));
}

#[tokio::test]
async fn test_probe_ignores_watch_field_when_not_fetching() {
    let mock = MockTransport::new();
    mock.push(ok(json!({"result": [{"sys_id": "a"}]}))).await;
    let gateway = gateway(&mock);
    let fetch = fetch(false);

    assert_eq!(
        ConnectivityProbe::new(&gateway, &fetch).run().await.unwrap(),
        "ok"
    );
}

#[tokio::test]
async fn test_probe_accepts_empty_table() {
    let mock = MockTransport::new();
    mock.push(ok(json!({"result": []}))).await;
    let gateway = gateway(&mock);
    let fetch = fetch(true);

    assert!(ConnectivityProbe::new(&gateway, &fetch).run().await.is_ok());
}

#[tokio::test]
async fn test_probe_rejects_bad_lookback_before_any_request() {
    let mock = MockTransport::new();
    let gateway = gateway(&mock);
    let fetch = FetchConfig {
        fetch_time: "a while".to_string(),
        ..Default::default()
    };

    let err = ConnectivityProbe::new(&gateway, &fetch).run().await.unwrap_err();
    assert!(matches!(err, GatewayError::ConfigurationError(_)));
    assert!(mock.requests().await.is_empty());
}

#[tokio::test]
async fn test_probe_surfaces_auth_failure() {
    let mock = MockTransport::new();
    mock.push(MockReply::json(
        401,
        &json!({"error": {"message": "User Not Authenticated", "detail": "Required to provide Auth information"}, "status": "failure"}),
    ))
    .await;
    let gateway = gateway(&mock);
    let fetch = fetch(false);

    let err = ConnectivityProbe::new(&gateway, &fetch).run().await.unwrap_err();
    match err {
        GatewayError::RemoteError(message) => {
            assert!(message.starts_with("Authorization failed, check the configured username"));
            assert!(message.contains("User Not Authenticated"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_rejects_lookback_beyond_calendar_without_request() {
    let mock = MockTransport::new();
    let gateway = gateway(&mock);
    let fetch = FetchConfig {
        fetch_time: "280000 years".to_string(),
        ..fetch(true)
    };

    let err = ConnectivityProbe::new(&gateway, &fetch).run().await.unwrap_err();

    assert!(matches!(err, GatewayError::ConfigurationError(_)));
    assert!(mock.requests().await.is_empty());
}

#[tokio::test]
async fn test_probe_rejects_body_without_result() {
    let mock = MockTransport::new();
    mock.push(ok(json!({"unexpected": true}))).await;
    let gateway = gateway(&mock);
    let fetch = fetch(false);

    assert!(matches!(
        ConnectivityProbe::new(&gateway, &fetch).run().await,
        Err(GatewayError::RemoteError(_))
    ));
}
