//! Transport port.
//!
//! The gateway talks to the remote table API exclusively through this
//! trait. Implementations execute exactly one request per call and hand
//! back the raw status and body; response classification (error
//! envelopes, "No Record found", empty bodies) is the gateway's job.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::GatewayResult;

/// HTTP verbs used against the table API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// Ordered query-string parameters.
pub type QueryParams = Vec<(String, String)>;

/// Raw outcome of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A multipart file upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Local file to send.
    pub path: PathBuf,
    /// Multipart field carrying the file bytes.
    pub field_name: String,
    /// File name reported to the remote.
    pub file_name: String,
    /// Extra text form fields.
    pub form: Vec<(String, String)>,
}

/// Request executor for the remote table API.
///
/// A call either completes with a response, or fails with a
/// connection-level [`GatewayError::RemoteError`](crate::domain::errors::GatewayError);
/// there are no partial results. Retries and timeouts belong to the
/// implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a JSON request against `path` (relative to the API base).
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        body: Option<&Value>,
    ) -> GatewayResult<TransportResponse>;

    /// Upload a file as multipart form data to `path`.
    async fn upload(&self, path: &str, upload: &FileUpload) -> GatewayResult<TransportResponse>;

    /// Download an absolute URL (attachment download links) with the same credentials.
    async fn download(&self, url: &str) -> GatewayResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_success_range() {
        assert!(TransportResponse::new(200, "").is_success());
        assert!(TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(199, "").is_success());
        assert!(!TransportResponse::new(300, "").is_success());
        assert!(!TransportResponse::new(404, "").is_success());
    }

    #[test]
    fn test_method_names() {
        assert_eq!(HttpMethod::Patch.as_str(), "PATCH");
    }
}
