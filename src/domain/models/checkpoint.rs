//! Poll checkpoints.
//!
//! A checkpoint is the timestamp (second resolution, `YYYY-MM-DD HH:MM:SS`)
//! of the last record a poll cycle scanned. The host persists it as an
//! opaque string; only the poller interprets it.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format of checkpoints and remote timestamp columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Last-seen timestamp of a watch source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checkpoint(String);

impl Checkpoint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Format a UTC instant as a checkpoint, truncating to whole seconds.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the checkpoint; `None` when it is not in the wire format.
    pub fn parsed(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.0)
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a remote timestamp column at second resolution.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}
