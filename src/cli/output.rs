//! Output formatting utilities for the CLI.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

use crate::domain::models::record::value_to_string;
use crate::domain::models::HumanReadableTicket;
use crate::services::operations::{OperationOutcome, TicketView};

const MAX_CELL_LEN: usize = 80;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to a maximum number of characters, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Printable wrapper around an operation result.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct OutcomeOutput {
    pub outcome: OperationOutcome,
}

impl From<OperationOutcome> for OutcomeOutput {
    fn from(outcome: OperationOutcome) -> Self {
        Self { outcome }
    }
}

impl CommandOutput for OutcomeOutput {
    fn to_human(&self) -> String {
        match &self.outcome {
            OperationOutcome::Ticket(view) => ticket_section(std::slice::from_ref(view)),
            OperationOutcome::Tickets(views) => ticket_section(views),
            OperationOutcome::Record(record) => rows_table(&[Value::Object(record.clone())]),
            OperationOutcome::Records(records) => {
                let rows: Vec<Value> = records.iter().cloned().map(Value::Object).collect();
                format!("Found {} record(s):\n{}", rows.len(), rows_table(&rows))
            }
            OperationOutcome::Notes(notes) => format!(
                "Notes for ticket {}:\n{}",
                notes.ticket_id,
                serialized_table(&notes.notes)
            ),
            OperationOutcome::Attachment(file) => format!(
                "File uploaded successfully\n{}",
                serialized_table(std::slice::from_ref(file))
            ),
            OperationOutcome::Fields(fields) => {
                let mut lines = vec![format!("Fields of {}:", fields.table)];
                lines.extend(fields.fields.iter().map(|f| format!("  - {f}")));
                lines.join("\n")
            }
            OperationOutcome::Tables(tables) => serialized_table(tables),
            OperationOutcome::Directory(listing) => match serde_json::to_value(listing) {
                Ok(Value::Array(rows)) => rows_table(&rows),
                Ok(other) => rows_table(&[other]),
                Err(_) => String::new(),
            },
            OperationOutcome::Batch(batch) => {
                let mut lines = vec![format!(
                    "Fetched {} incident(s), scanned {}, checkpoint {}",
                    batch.events.len(),
                    batch.scanned,
                    batch.checkpoint
                )];
                if !batch.events.is_empty() {
                    let mut table = base_table();
                    table.set_header(header(&["Name", "Severity", "Attachments"]));
                    for event in &batch.events {
                        table.add_row(vec![
                            Cell::new(&event.name),
                            Cell::new(event.severity),
                            Cell::new(event.attachments.len()),
                        ]);
                    }
                    lines.push(table.to_string());
                }
                lines.join("\n")
            }
            OperationOutcome::Deleted(message)
            | OperationOutcome::Probe(message)
            | OperationOutcome::Empty(message) => message.clone(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(columns: &[&str]) -> Vec<Cell> {
    columns
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

fn ticket_section(views: &[TicketView]) -> String {
    let mut table = base_table();
    table.set_header(header(&HumanReadableTicket::HEADERS));

    for view in views {
        let row = serde_json::to_value(&view.display).unwrap_or_default();
        table.add_row(
            HumanReadableTicket::HEADERS
                .iter()
                .map(|column| Cell::new(cell_text(row.get(*column))))
                .collect::<Vec<_>>(),
        );
    }

    let mut out = table.to_string();
    for view in views {
        for file in &view.attachments {
            out.push_str(&format!(
                "\nAttachment: {} ({} bytes)",
                file.file_name,
                file.content.len()
            ));
        }
    }
    out
}

fn serialized_table<T: Serialize>(items: &[T]) -> String {
    let rows: Vec<Value> = items
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect();
    rows_table(&rows)
}

/// Render JSON objects as a table, columns in first-seen order.
fn rows_table(rows: &[Value]) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        if let Value::Object(map) = row {
            for key in map.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }
    }

    let mut table = base_table();
    table.set_header(header(&columns));
    for row in rows {
        table.add_row(
            columns
                .iter()
                .map(|column| Cell::new(cell_text(row.get(*column))))
                .collect::<Vec<_>>(),
        );
    }
    table.to_string()
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(value) => truncate(&value_to_string(value), MAX_CELL_LEN),
    }
}
