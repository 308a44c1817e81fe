//! Table API gateway.
//!
//! Every CRUD and search call goes through [`ResourceGateway`], which
//! builds the request path and query, executes it on the [`Transport`]
//! and classifies the response uniformly:
//!
//! - a body that is empty is an empty success ([`RemotePayload::Empty`]);
//! - a body that is not JSON is a [`GatewayError::RemoteError`];
//! - an error envelope whose message is `No Record found` becomes `{"result": []}`;
//! - any other error envelope, or a non-2xx status, is a `RemoteError`.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::record::{records_of, value_to_string, Record};
use crate::domain::models::AttachmentFile;
use crate::domain::ports::{FileUpload, HttpMethod, QueryParams, Transport, TransportResponse};

use super::field_mapper::Template;
use super::query_builder::{parse_template, QueryBuilder, PARAM_LIMIT, PARAM_QUERY};

const NO_RECORD_FOUND: &str = "No Record found";
const TEMPLATE_TABLE: &str = "sys_template";
const ATTACHMENT_PATH: &str = "attachment";
const UPLOAD_PATH: &str = "attachment/upload";

/// A classified remote response.
#[derive(Debug, Clone, PartialEq)]
pub enum RemotePayload {
    /// The remote answered with an empty body.
    Empty,
    /// A parsed JSON document, normally `{"result": ...}`.
    Json(Value),
}

impl RemotePayload {
    /// The `result` member, if any.
    pub fn result(&self) -> Option<&Value> {
        match self {
            Self::Empty => None,
            Self::Json(value) => value.get("result"),
        }
    }

    /// Rows of the `result` member; a single object counts as one row.
    pub fn records(&self) -> Vec<Record> {
        self.result().map(records_of).unwrap_or_default()
    }

    /// First row of the result, if there is one.
    pub fn first(&self) -> Option<Record> {
        self.records().into_iter().next()
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Empty => Value::String(String::new()),
            Self::Json(value) => value,
        }
    }
}

/// Classify a raw transport response.
pub fn classify_response(response: &TransportResponse) -> GatewayResult<RemotePayload> {
    let parsed: Value = match serde_json::from_slice(&response.body) {
        Ok(value) => value,
        Err(_) if response.body.iter().all(u8::is_ascii_whitespace) => {
            return Ok(RemotePayload::Empty);
        }
        Err(err) => {
            return Err(GatewayError::RemoteError(format!(
                "Error parsing reply - {} - {err}",
                String::from_utf8_lossy(&response.body)
            )));
        }
    };

    if let Some(envelope) = parsed.get("error") {
        let message = envelope.get("message").map(value_to_string);
        if message.as_deref() == Some(NO_RECORD_FOUND) {
            return Ok(RemotePayload::Json(json!({ "result": [] })));
        }
        let detail = envelope.get("detail").map(value_to_string);
        return Err(GatewayError::RemoteError(format!(
            "{}, details: {}",
            message.unwrap_or_default(),
            detail.unwrap_or_default()
        )));
    }

    if !response.is_success() {
        return Err(GatewayError::RemoteError(format!(
            "Got status code {} with body {}",
            response.status,
            String::from_utf8_lossy(&response.body)
        )));
    }

    Ok(RemotePayload::Json(parsed))
}

/// Row selector for [`ResourceGateway::get`].
///
/// Precedence is `id`, then `number`, then `custom_fields`; empty strings
/// count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSelector {
    pub id: Option<String>,
    pub number: Option<String>,
    /// Comma-separated `key=value` equality filter; surrounding quotes on values are stripped.
    pub custom_fields: Option<String>,
}

impl GetSelector {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn by_number(number: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            ..Default::default()
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_selector_fields(raw: &str) -> GatewayResult<QueryParams> {
    raw.split(',')
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => Ok((key.to_string(), value.trim_matches('"').to_string())),
            None => Err(GatewayError::InvalidArgument(format!(
                "custom field filter '{pair}' is not in key=value form"
            ))),
        })
        .collect()
}

fn table_path(table: &str) -> String {
    format!("table/{table}")
}

fn row_path(table: &str, id: &str) -> String {
    format!("table/{table}/{id}")
}

/// Facade over the remote table API.
#[derive(Clone)]
pub struct ResourceGateway {
    transport: Arc<dyn Transport>,
    queries: QueryBuilder,
}

impl ResourceGateway {
    pub fn new(transport: Arc<dyn Transport>, queries: QueryBuilder) -> Self {
        Self { transport, queries }
    }

    pub fn queries(&self) -> &QueryBuilder {
        &self.queries
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        body: Option<&Value>,
    ) -> GatewayResult<RemotePayload> {
        tracing::debug!(method = method.as_str(), path = %path, "Sending table API request");
        let response = self.transport.send(method, path, query, body).await?;
        classify_response(&response)
    }

    /// Fetch one row by id, or the rows matching a number or field filter.
    pub async fn get(&self, table: &str, selector: &GetSelector) -> GatewayResult<RemotePayload> {
        if let Some(id) = non_empty(&selector.id) {
            return self
                .send(HttpMethod::Get, &row_path(table, id), &Vec::new(), None)
                .await;
        }

        let query = if let Some(number) = non_empty(&selector.number) {
            vec![("number".to_string(), number.to_string())]
        } else if let Some(fields) = non_empty(&selector.custom_fields) {
            parse_selector_fields(fields)?
        } else {
            return Err(GatewayError::InvalidArgument(
                "get requires either a record ID (sys_id), a number or custom fields".to_string(),
            ));
        };

        self.send(HttpMethod::Get, &table_path(table), &query, None)
            .await
    }

    /// List rows matching a raw filter expression. An empty result is not an error.
    pub async fn query(
        &self,
        table: &str,
        limit: Option<u32>,
        offset: Option<u32>,
        filter: Option<&str>,
    ) -> GatewayResult<Vec<Record>> {
        let terms: Vec<&str> = filter.into_iter().collect();
        let params = self.queries.build(None, &terms, limit, offset);
        let payload = self
            .send(HttpMethod::Get, &table_path(table), &params, None)
            .await?;
        let records = payload.records();
        tracing::debug!(table = %table, count = records.len(), "Query returned");
        Ok(records)
    }

    /// One-row probe of a table, returned unclassified beyond the envelope rules.
    pub async fn sample(&self, table: &str) -> GatewayResult<RemotePayload> {
        let params = vec![(PARAM_LIMIT.to_string(), "1".to_string())];
        self.send(HttpMethod::Get, &table_path(table), &params, None)
            .await
    }

    pub async fn create(&self, table: &str, body: &Record) -> GatewayResult<Record> {
        let body = Value::Object(body.clone());
        let payload = self
            .send(HttpMethod::Post, &table_path(table), &Vec::new(), Some(&body))
            .await?;
        let created = payload.first().ok_or_else(unretrievable)?;
        tracing::info!(table = %table, sys_id = ?created.get("sys_id"), "Record created");
        Ok(created)
    }

    pub async fn update(&self, table: &str, id: &str, body: &Record) -> GatewayResult<Record> {
        let body = Value::Object(body.clone());
        let payload = self
            .send(HttpMethod::Patch, &row_path(table, id), &Vec::new(), Some(&body))
            .await?;
        let updated = payload.first().ok_or_else(unretrievable)?;
        tracing::info!(table = %table, sys_id = %id, "Record updated");
        Ok(updated)
    }

    pub async fn delete(&self, table: &str, id: &str) -> GatewayResult<RemotePayload> {
        let payload = self
            .send(HttpMethod::Delete, &row_path(table, id), &Vec::new(), None)
            .await?;
        tracing::info!(table = %table, sys_id = %id, "Record deleted");
        Ok(payload)
    }

    /// Resolve a named template into its default fields.
    pub async fn template(&self, name: &str) -> GatewayResult<Template> {
        let params = QueryBuilder::template_lookup(name);
        let payload = self
            .send(HttpMethod::Get, &table_path(TEMPLATE_TABLE), &params, None)
            .await?;
        let row = payload
            .first()
            .ok_or_else(|| GatewayError::NotFound("Incorrect template name".to_string()))?;
        let raw = row.get("template").map(value_to_string).unwrap_or_default();
        Ok(parse_template(&raw))
    }

    /// `(download_link, file_name)` of every attachment on a row.
    pub async fn attachment_links(&self, sys_id: &str) -> GatewayResult<Vec<(String, String)>> {
        let params = vec![(PARAM_QUERY.to_string(), format!("table_sys_id={sys_id}"))];
        let payload = self
            .send(HttpMethod::Get, ATTACHMENT_PATH, &params, None)
            .await?;
        Ok(payload
            .records()
            .iter()
            .map(|a| {
                (
                    a.get("download_link").map(value_to_string).unwrap_or_default(),
                    a.get("file_name").map(value_to_string).unwrap_or_default(),
                )
            })
            .collect())
    }

    /// Download every attachment of a row, one request at a time.
    ///
    /// Any failed download aborts the whole call.
    pub async fn download_attachments(&self, sys_id: &str) -> GatewayResult<Vec<AttachmentFile>> {
        let links = self.attachment_links(sys_id).await?;
        let mut files = Vec::with_capacity(links.len());
        for (link, file_name) in links {
            let content = self.transport.download(&link).await.map_err(|err| {
                GatewayError::RemoteError(format!("Error getting attachment {file_name}: {err}"))
            })?;
            files.push(AttachmentFile { file_name, content });
        }
        tracing::debug!(sys_id = %sys_id, count = files.len(), "Attachments downloaded");
        Ok(files)
    }

    /// Attach a local file to a row.
    pub async fn upload_attachment(
        &self,
        table: &str,
        sys_id: &str,
        path: PathBuf,
        file_name: &str,
    ) -> GatewayResult<Record> {
        let upload = FileUpload {
            path,
            field_name: "file".to_string(),
            file_name: file_name.to_string(),
            form: vec![
                ("table_name".to_string(), table.to_string()),
                ("table_sys_id".to_string(), sys_id.to_string()),
                ("file_name".to_string(), file_name.to_string()),
            ],
        };
        let response = self.transport.upload(UPLOAD_PATH, &upload).await?;
        let payload = classify_response(&response)?;
        let uploaded = payload.first().ok_or_else(unretrievable)?;
        tracing::info!(table = %table, sys_id = %sys_id, file_name = %file_name, "File uploaded");
        Ok(uploaded)
    }
}

fn unretrievable() -> GatewayError {
    GatewayError::RemoteError("Unable to retrieve response".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(status: u16, body: &str) -> GatewayResult<RemotePayload> {
        classify_response(&TransportResponse::new(status, body))
    }

    #[test]
    fn test_no_record_found_is_empty_result() {
        let payload = classify(404, r#"{"error": {"message": "No Record found", "detail": "x"}}"#).unwrap();
        assert_eq!(payload, RemotePayload::Json(json!({"result": []})));
        assert!(payload.records().is_empty());
    }

    #[test]
    fn test_error_envelope_is_remote_error() {
        let err = classify(400, r#"{"error": {"message": "Invalid table", "detail": "no such table"}}"#)
            .unwrap_err();
        match err {
            GatewayError::RemoteError(msg) => {
                assert!(msg.contains("Invalid table"));
                assert!(msg.contains("no such table"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_envelope_wins_over_success_status() {
        assert!(classify(200, r#"{"error": {"message": "boom"}}"#).is_err());
    }

    #[test]
    fn test_empty_body_vs_garbage_body() {
        assert_eq!(classify(204, "").unwrap(), RemotePayload::Empty);
        assert_eq!(classify(200, "  ").unwrap(), RemotePayload::Empty);
        assert!(matches!(
            classify(200, "<html>oops</html>"),
            Err(GatewayError::RemoteError(_))
        ));
    }

    #[test]
    fn test_empty_body_is_empty_whatever_the_status() {
        assert_eq!(classify(403, "").unwrap(), RemotePayload::Empty);
        assert_eq!(classify(500, "\n").unwrap(), RemotePayload::Empty);
    }

    #[test]
    fn test_bad_status_without_envelope() {
        let err = classify(500, r#"{"status": "down"}"#).unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_single_and_list_results() {
        let single = classify(200, r#"{"result": {"sys_id": "a"}}"#).unwrap();
        assert_eq!(single.records().len(), 1);
        let list = classify(200, r#"{"result": [{"sys_id": "a"}, {"sys_id": "b"}]}"#).unwrap();
        assert_eq!(list.first().unwrap()["sys_id"], json!("a"));
        assert_eq!(RemotePayload::Empty.into_value(), json!(""));
    }

    #[test]
    fn test_parse_selector_fields_strips_quotes() {
        let parsed = parse_selector_fields(r#"u_team="blue",active=true"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("u_team".to_string(), "blue".to_string()),
                ("active".to_string(), "true".to_string())
            ]
        );
        assert!(parse_selector_fields("nope").is_err());
    }
}
