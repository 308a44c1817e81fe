//! Checkpointed incremental polling.
//!
//! One call to [`IncrementalPoller::poll_once`] is one cycle: read the
//! checkpoint (seeding it from the lookback window on the first run), query
//! the watch table for rows whose timestamp column is strictly after it,
//! turn the rows into events, and overwrite the checkpoint with the
//! timestamp of the last row scanned.
//!
//! The page is trusted to arrive in `ORDERBY` order: the checkpoint is the
//! last row's timestamp, not the page maximum. The host must not run two
//! cycles against the same checkpoint slot at once.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::record::{value_to_string, Record};
use crate::domain::models::{
    event_severity, parse_timestamp, Checkpoint, FetchConfig, LookbackWindow, PollBatch, PollEvent,
    ResourceKind,
};
use crate::domain::ports::CheckpointStore;

use super::gateway::ResourceGateway;
use super::query_builder::changed_since;

/// What and how a poller watches.
#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    pub kind: ResourceKind,
    pub base_filter: Option<String>,
    /// Query page size, also the per-cycle item cap.
    pub page_size: u32,
    pub timestamp_field: String,
    pub lookback: LookbackWindow,
    pub get_attachments: bool,
}

impl PollSettings {
    pub fn from_config(fetch: &FetchConfig) -> GatewayResult<Self> {
        Ok(Self {
            kind: ResourceKind::from_table(&fetch.ticket_type),
            base_filter: fetch.sysparm_query.clone().filter(|q| !q.is_empty()),
            page_size: fetch.fetch_limit,
            timestamp_field: fetch.timestamp_field.clone(),
            lookback: LookbackWindow::parse(&fetch.fetch_time)?,
            get_attachments: fetch.get_attachments,
        })
    }
}

pub struct IncrementalPoller {
    gateway: ResourceGateway,
    store: Arc<dyn CheckpointStore>,
    settings: PollSettings,
}

impl IncrementalPoller {
    pub fn new(
        gateway: ResourceGateway,
        store: Arc<dyn CheckpointStore>,
        settings: PollSettings,
    ) -> Self {
        Self {
            gateway,
            store,
            settings,
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Run one cycle against the current wall clock.
    pub async fn poll_once(&self) -> GatewayResult<PollBatch> {
        self.poll_at(Utc::now()).await
    }

    /// Run one cycle; `now` only matters when the checkpoint must be seeded.
    pub async fn poll_at(&self, now: DateTime<Utc>) -> GatewayResult<PollBatch> {
        let settings = &self.settings;
        let field = settings.timestamp_field.as_str();

        let checkpoint = match self.store.load().await? {
            Some(checkpoint) => checkpoint,
            None => {
                let seeded = settings.lookback.seed_checkpoint(now)?;
                tracing::info!(checkpoint = %seeded, lookback = %settings.lookback, "Seeding checkpoint");
                seeded
            }
        };
        let floor = checkpoint.parsed();
        if floor.is_none() {
            tracing::warn!(checkpoint = %checkpoint, "Checkpoint is not a timestamp; re-filtering disabled");
        }

        let filter = changed_since(settings.base_filter.as_deref(), field, checkpoint.as_str());
        let table = settings.kind.table_name();
        let candidates = self
            .gateway
            .query(table, Some(settings.page_size), Some(0), Some(&filter))
            .await?;

        let mut latest = checkpoint.clone();
        let mut events = Vec::new();
        let mut scanned: usize = 0;

        for record in &candidates {
            let stamp = record.get(field).map(value_to_string).ok_or_else(|| {
                GatewayError::ConfigurationError(format!(
                    "The timestamp field [{field}] does not exist in the ticket"
                ))
            })?;

            if scanned > settings.page_size as usize {
                break;
            }

            let stale = match (parse_timestamp(&stamp), floor) {
                (Some(at), Some(floor)) => at < floor,
                _ => false,
            };
            if stale {
                tracing::debug!(timestamp = %stamp, checkpoint = %checkpoint, "Skipping record older than checkpoint");
            } else {
                events.push(self.build_event(record).await?);
            }

            scanned += 1;
            latest = Checkpoint::new(stamp);
        }

        self.store.save(&latest).await?;
        tracing::info!(
            table = %table,
            count = events.len(),
            scanned,
            checkpoint = %latest,
            "Poll cycle complete"
        );

        Ok(PollBatch {
            events,
            checkpoint: latest,
            scanned,
        })
    }

    async fn build_event(&self, record: &Record) -> GatewayResult<PollEvent> {
        let number = record.get("number").map(value_to_string).unwrap_or_default();
        let severity = record.get("severity").map(value_to_string);

        let attachments = if self.settings.get_attachments {
            let sys_id = record.get("sys_id").map(value_to_string).ok_or_else(|| {
                GatewayError::RemoteError(format!("Record {number} has no sys_id"))
            })?;
            self.gateway.download_attachments(&sys_id).await?
        } else {
            Vec::new()
        };

        Ok(PollEvent {
            name: format!("{} {}", self.settings.kind.display_label(), number),
            labels: PollEvent::labels_for(record),
            severity: event_severity(severity.as_deref()),
            raw: record.clone(),
            attachments,
        })
    }
}
