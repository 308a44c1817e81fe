//! Events emitted by a poll cycle.

use serde::{Deserialize, Serialize};

use super::checkpoint::Checkpoint;
use super::record::{value_to_string, Record};

/// Flat label/value pair describing one raw field of a polled record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLabel {
    #[serde(rename = "type")]
    pub label_type: String,
    pub value: String,
}

/// A downloaded ticket attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentFile {
    pub file_name: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// One record turned into a host incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollEvent {
    pub name: String,
    pub labels: Vec<EventLabel>,
    /// Host severity: 3 high, 2 medium, 1 low, 0 unknown.
    pub severity: u8,
    pub raw: Record,
    #[serde(default)]
    pub attachments: Vec<AttachmentFile>,
}

impl PollEvent {
    /// Flatten every raw field into labels; non-string values are JSON-encoded.
    pub fn labels_for(record: &Record) -> Vec<EventLabel> {
        record
            .iter()
            .map(|(k, v)| EventLabel {
                label_type: k.clone(),
                value: value_to_string(v),
            })
            .collect()
    }
}

/// Map the remote severity code to the host's numeric severity.
pub fn event_severity(code: Option<&str>) -> u8 {
    match code {
        Some("1") => 3,
        Some("2") => 2,
        Some("3") => 1,
        _ => 0,
    }
}

/// Result of a poll cycle: the emitted batch and the checkpoint written after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollBatch {
    pub events: Vec<PollEvent>,
    pub checkpoint: Checkpoint,
    /// Candidates scanned, including those filtered out before emission.
    pub scanned: usize,
}
