//! Typed views of ticket records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ticket columns a caller may set through the typed ticket operations.
///
/// Any other key reaching an outbound ticket body must be a `u_` custom field.
pub const RECOGNIZED_ARGS: &[&str] = &[
    "active",
    "activity_due",
    "opened_at",
    "short_description",
    "additional_assignee_list",
    "approval_history",
    "approval_set",
    "assigned_to",
    "assignment_group",
    "business_duration",
    "business_service",
    "business_stc",
    "calendar_duration",
    "calendar_stc",
    "caller_id",
    "caused_by",
    "close_code",
    "close_notes",
    "closed_at",
    "closed_by",
    "cmdb_ci",
    "comments",
    "comments_and_work_notes",
    "company",
    "contact_type",
    "correlation_display",
    "correlation_id",
    "delivery_plan",
    "delivery_task",
    "description",
    "due_date",
    "expected_start",
    "follow_up",
    "group_list",
    "hold_reason",
    "impact",
    "incident_state",
    "knowledge",
    "location",
    "made_sla",
    "notify",
    "order",
    "parent",
    "parent_incident",
    "priority",
    "problem_id",
    "resolved_at",
    "resolved_by",
    "rfc",
    "severity",
    "sla_due",
    "state",
    "subcategory",
    "sys_tags",
    "time_worked",
    "urgency",
    "user_input",
    "watch_list",
    "work_end",
    "work_notes",
    "work_notes_list",
    "work_start",
    "title",
    "type",
    "change_type",
    "category",
    "caller",
];

/// Whether `name` may appear in an outbound ticket body.
pub fn is_recognized_arg(name: &str) -> bool {
    RECOGNIZED_ARGS.contains(&name)
}

/// Normalized ticket view handed to callers.
///
/// Only keys present (and non-null) upstream are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NormalizedTicket {
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_comments: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_code: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Wider display projection of a ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HumanReadableTicket {
    #[serde(rename = "Number", skip_serializing_if = "Option::is_none")]
    pub number: Option<Value>,
    #[serde(rename = "System ID", skip_serializing_if = "Option::is_none")]
    pub system_id: Option<Value>,
    #[serde(rename = "Impact", skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(rename = "Urgency", skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(rename = "Severity", skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(rename = "Priority", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(rename = "State", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "Created On", skip_serializing_if = "Option::is_none")]
    pub created_on: Option<Value>,
    #[serde(rename = "Created By", skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Value>,
    #[serde(rename = "Active", skip_serializing_if = "Option::is_none")]
    pub active: Option<Value>,
    #[serde(rename = "Close Notes", skip_serializing_if = "Option::is_none")]
    pub close_notes: Option<Value>,
    #[serde(rename = "Close Code", skip_serializing_if = "Option::is_none")]
    pub close_code: Option<Value>,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(rename = "Opened At", skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<Value>,
    #[serde(rename = "Due Date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Value>,
    #[serde(rename = "Resolved By", skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<Value>,
    #[serde(rename = "Resolved At", skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<Value>,
    #[serde(rename = "SLA Due", skip_serializing_if = "Option::is_none")]
    pub sla_due: Option<Value>,
    #[serde(rename = "Short Description", skip_serializing_if = "Option::is_none")]
    pub short_description: Option<Value>,
    #[serde(rename = "Additional Comments", skip_serializing_if = "Option::is_none")]
    pub additional_comments: Option<Value>,
}

impl HumanReadableTicket {
    /// Column order used when rendering tables.
    pub const HEADERS: [&'static str; 20] = [
        "System ID",
        "Number",
        "Impact",
        "Urgency",
        "Severity",
        "Priority",
        "State",
        "Created On",
        "Created By",
        "Active",
        "Close Notes",
        "Close Code",
        "Description",
        "Opened At",
        "Due Date",
        "Resolved By",
        "Resolved At",
        "SLA Due",
        "Short Description",
        "Additional Comments",
    ];
}

/// Kind of journal entry attached to a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteType {
    #[serde(rename = "Work Note")]
    WorkNote,
    Comment,
}

impl NoteType {
    /// Journal `element` column value to note type.
    pub fn from_element(element: &str) -> Self {
        if element == "work_notes" {
            Self::WorkNote
        } else {
            Self::Comment
        }
    }
}

/// A comment or work note read from the journal table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TicketNote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Value>,
    #[serde(rename = "Type")]
    pub note_type: NoteType,
}
