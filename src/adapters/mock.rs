//! Mock transport for testing.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::ports::{FileUpload, HttpMethod, QueryParams, Transport, TransportResponse};

/// Scripted outcome of one request.
#[derive(Debug, Clone)]
pub enum MockReply {
    Response(TransportResponse),
    /// Connection-level failure.
    Failure(String),
}

impl MockReply {
    pub fn json(status: u16, body: &Value) -> Self {
        Self::Response(TransportResponse::new(status, body.to_string()))
    }

    pub fn raw(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::Response(TransportResponse::new(status, body))
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }
}

/// A request the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: QueryParams,
    pub body: Option<Value>,
    pub upload: Option<FileUpload>,
}

impl RecordedRequest {
    /// First value of a query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Transport that replays scripted replies in order and records every request.
///
/// Requests beyond the script fail with a remote error. Downloads are served
/// from a separate URL map.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<RwLock<VecDeque<MockReply>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    downloads: Arc<RwLock<HashMap<String, Result<Vec<u8>, String>>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            replies: Arc::new(RwLock::new(replies.into_iter().collect())),
            ..Self::default()
        }
    }

    pub async fn push(&self, reply: MockReply) {
        self.replies.write().await.push_back(reply);
    }

    /// Queue a `200` reply carrying `body`.
    pub async fn push_ok(&self, body: Value) {
        self.push(MockReply::json(200, &body)).await;
    }

    pub async fn set_download(&self, url: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.downloads
            .write()
            .await
            .insert(url.into(), Ok(content.into()));
    }

    pub async fn fail_download(&self, url: impl Into<String>, message: impl Into<String>) {
        self.downloads
            .write()
            .await
            .insert(url.into(), Err(message.into()));
    }

    /// All requests received so far, in order.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.read().await.last().cloned()
    }

    /// Scripted replies not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.replies.read().await.len()
    }

    async fn next_reply(&self, request: RecordedRequest) -> GatewayResult<TransportResponse> {
        let description = format!("{} {}", request.method.as_str(), request.path);
        self.requests.write().await.push(request);

        match self.replies.write().await.pop_front() {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Failure(message)) => Err(GatewayError::RemoteError(message)),
            None => Err(GatewayError::RemoteError(format!(
                "No scripted reply for {description}"
            ))),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        body: Option<&Value>,
    ) -> GatewayResult<TransportResponse> {
        self.next_reply(RecordedRequest {
            method,
            path: path.to_string(),
            query: query.clone(),
            body: body.cloned(),
            upload: None,
        })
        .await
    }

    async fn upload(&self, path: &str, upload: &FileUpload) -> GatewayResult<TransportResponse> {
        self.next_reply(RecordedRequest {
            method: HttpMethod::Post,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            upload: Some(upload.clone()),
        })
        .await
    }

    async fn download(&self, url: &str) -> GatewayResult<Vec<u8>> {
        match self.downloads.read().await.get(url) {
            Some(Ok(content)) => Ok(content.clone()),
            Some(Err(message)) => Err(GatewayError::RemoteError(message.clone())),
            None => Err(GatewayError::RemoteError(format!("No download scripted for {url}"))),
        }
    }
}
