//! Schema-less table records.
//!
//! A record is an untyped field map. Some values are reference objects
//! (`{"value": "<sys_id>", "display_value": "..."}`) pointing at a row in
//! another table. Only the five audit fields are assumed to exist on
//! every table.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw table row as returned by the remote service.
pub type Record = serde_json::Map<String, Value>;

/// Audit fields present on every table, with their projected names.
pub const AUDIT_FIELDS: [(&str, &str); 5] = [
    ("sys_id", "ID"),
    ("sys_updated_by", "UpdatedBy"),
    ("sys_updated_on", "UpdatedAt"),
    ("sys_created_by", "CreatedBy"),
    ("sys_created_on", "CreatedAt"),
];

/// A pointer to a row in another table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// The referenced row's `sys_id`.
    pub value: String,
    /// Human-readable rendering, when the remote includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

impl Reference {
    /// Interpret a field value as a reference, if it has the `{value: ...}` shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("value")?;
        Some(Self {
            value: value_to_string(id),
            display_value: obj
                .get("display_value")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// Render a field value as a flat string.
///
/// Strings are returned verbatim; every other value is JSON-encoded.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Collapse a reference object to its id, leaving other values untouched.
pub fn collapse_reference(value: &Value) -> Value {
    match value {
        Value::Object(obj) => obj.get("value").cloned().unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

/// Project the audit fields of a record onto their display names.
pub fn audit_projection(record: &Record) -> Record {
    AUDIT_FIELDS
        .iter()
        .filter_map(|(field, name)| record.get(*field).map(|v| ((*name).to_string(), v.clone())))
        .collect()
}

/// Keep only the requested fields (plus `sys_id`, renamed `ID`), collapsing references.
pub fn field_projection(record: &Record, fields: &[String]) -> Record {
    let mut projected: Record = record
        .iter()
        .filter(|(k, _)| k.as_str() == "sys_id" || fields.iter().any(|f| f == *k))
        .map(|(k, v)| (k.clone(), collapse_reference(v)))
        .collect();

    if let Some(id) = projected.remove("sys_id") {
        projected.insert("ID".to_string(), id);
    }
    projected
}

/// Extract the rows of a `{result: ...}` value, whether a list or a single object.
pub fn records_of(result: &Value) -> Vec<Record> {
    match result {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object().cloned())
            .collect(),
        Value::Object(obj) => vec![obj.clone()],
        _ => Vec::new(),
    }
}
