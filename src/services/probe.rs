//! Pre-flight connectivity check.

use chrono::Utc;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::record::records_of;
use crate::domain::models::{FetchConfig, LookbackWindow};

use super::gateway::{RemotePayload, ResourceGateway};

/// Checks credentials, the watch table and the fetch settings without mutating anything.
pub struct ConnectivityProbe<'a> {
    gateway: &'a ResourceGateway,
    fetch: &'a FetchConfig,
}

impl<'a> ConnectivityProbe<'a> {
    pub fn new(gateway: &'a ResourceGateway, fetch: &'a FetchConfig) -> Self {
        Self { gateway, fetch }
    }

    /// Returns `"ok"` when the instance is usable with this configuration.
    pub async fn run(&self) -> GatewayResult<&'static str> {
        LookbackWindow::parse(&self.fetch.fetch_time)?.seed_checkpoint(Utc::now())?;

        let table = self.fetch.ticket_type.as_str();
        let payload = self.gateway.sample(table).await.map_err(authorization_hint)?;
        let result = payload.result().ok_or_else(|| {
            let body = match &payload {
                RemotePayload::Empty => String::new(),
                RemotePayload::Json(value) => value.to_string(),
            };
            GatewayError::RemoteError(format!("Unexpected response from table {table}: {body}"))
        })?;

        if self.fetch.enabled {
            if let Some(sample) = records_of(result).first() {
                let field = &self.fetch.timestamp_field;
                if !sample.contains_key(field) {
                    return Err(GatewayError::ConfigurationError(format!(
                        "The timestamp field [{field}] does not exist in the ticket."
                    )));
                }
            }
        }

        tracing::info!(table = %table, "Connectivity probe passed");
        Ok("ok")
    }
}

const AUTH_FAILURES: [&str; 2] = ["User Not Authenticated", "Unauthorized"];

fn authorization_hint(err: GatewayError) -> GatewayError {
    match err {
        GatewayError::RemoteError(message)
            if AUTH_FAILURES.iter().any(|marker| message.contains(marker)) =>
        {
            GatewayError::RemoteError(format!(
                "Authorization failed, check the configured username and password: {message}"
            ))
        }
        other => other,
    }
}
