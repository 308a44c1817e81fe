//! reqwest-backed [`Transport`] for the table API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, Method, RequestBuilder};
use serde_json::Value;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::InstanceConfig;
use crate::domain::ports::{FileUpload, HttpMethod, QueryParams, Transport, TransportResponse};
use crate::infrastructure::logging::scrub;

/// HTTP client for the table API
///
/// Features:
/// - Basic authentication on every request, including attachment downloads
/// - Optional proxy and TLS verification opt-out
/// - One request per call; no retries
pub struct HttpTransport {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl HttpTransport {
    /// Build a transport for the configured instance.
    ///
    /// # Errors
    /// Returns an error if the proxy URL is invalid or the client cannot be built
    pub fn new(instance: &InstanceConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(instance.timeout_secs))
            .danger_accept_invalid_certs(instance.insecure);

        if let Some(proxy) = instance.proxy.as_deref().filter(|p| !p.is_empty()) {
            let proxy = reqwest::Proxy::all(proxy).context("Invalid proxy URL")?;
            builder = builder.proxy(proxy);
        }

        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: instance.api_base_url(),
            username: instance.username.clone(),
            password: instance.password.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
            .header(header::ACCEPT, "application/json")
    }

    async fn complete(&self, request: RequestBuilder) -> GatewayResult<TransportResponse> {
        let response = request.send().await.map_err(connection_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(connection_error)?;
        tracing::debug!(status, bytes = body.len(), "Table API responded");
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn connection_error(err: reqwest::Error) -> GatewayError {
    GatewayError::RemoteError(scrub(&format!("Request failed: {err}")))
}

/// Multipart uploads are not served by the versioned `v2` endpoint.
fn upload_url(url: &str) -> String {
    url.replacen("/api/now/v2/", "/api/now/v1/", 1)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        body: Option<&Value>,
    ) -> GatewayResult<TransportResponse> {
        let url = self.url(path);
        let mut request = self
            .authorized(to_method(method), &url)
            .header(header::CONTENT_TYPE, "application/json")
            .query(query);

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        self.complete(request).await
    }

    async fn upload(&self, path: &str, upload: &FileUpload) -> GatewayResult<TransportResponse> {
        let url = upload_url(&self.url(path));
        let content = tokio::fs::read(&upload.path).await.map_err(|e| {
            GatewayError::Io(format!(
                "Failed to upload file - {}: {e}",
                upload.path.display()
            ))
        })?;

        let mut form = Form::new();
        for (name, value) in &upload.form {
            form = form.text(name.clone(), value.clone());
        }
        form = form.part(
            upload.field_name.clone(),
            Part::bytes(content).file_name(upload.file_name.clone()),
        );

        let request = self.authorized(Method::POST, &url).multipart(form);
        self.complete(request).await
    }

    async fn download(&self, url: &str) -> GatewayResult<Vec<u8>> {
        let response = self.complete(self.authorized(Method::GET, url)).await?;
        if !response.is_success() {
            return Err(GatewayError::RemoteError(format!(
                "Download returned status {}",
                response.status
            )));
        }
        Ok(response.body)
    }
}
