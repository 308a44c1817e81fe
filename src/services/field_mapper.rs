//! Field mapping between caller arguments, templates and remote records.
//!
//! Outbound, [`FieldMapper::build_body`] merges recognized caller arguments
//! over template defaults and appends `u_`-prefixed custom fields.
//! Inbound, [`FieldMapper::normalize`] projects a raw ticket row into the
//! [`NormalizedTicket`] view, translating enum codes through the catalog.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::record::{collapse_reference, value_to_string, Record, Reference};
use crate::domain::models::ticket::is_recognized_arg;
use crate::domain::models::{
    EnumCatalog, EnumField, HumanReadableTicket, NormalizedTicket, ResourceKind, RECOGNIZED_ARGS,
};

/// Named caller arguments for a ticket write. Empty values count as absent.
pub type TicketArgs = BTreeMap<String, String>;

/// Default field set parsed from a server-side template.
pub type Template = BTreeMap<String, String>;

/// Ordered `key=value` pairs; later pairs win on key collision.
pub type FieldPairs = Vec<(String, String)>;

const CUSTOM_PREFIX: &str = "u_";

/// Maps fields in both directions for ticket tables.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapper {
    legacy_field_format: bool,
    catalog: &'static EnumCatalog,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(false)
    }
}

impl FieldMapper {
    /// With `legacy_field_format`, normalized `Priority` and `State` keep the raw codes.
    pub fn new(legacy_field_format: bool) -> Self {
        Self {
            legacy_field_format,
            catalog: EnumCatalog::global(),
        }
    }

    pub fn legacy_field_format(&self) -> bool {
        self.legacy_field_format
    }

    /// Merge caller arguments, template defaults and custom fields into one body.
    ///
    /// Only recognized argument names are taken from `caller_args` or the
    /// template; enum columns given as labels are translated back to codes.
    /// Custom fields are inserted last under a `u_` prefix and win on collision.
    pub fn build_body(
        &self,
        kind: &ResourceKind,
        caller_args: &TicketArgs,
        template: Option<&Template>,
        custom_fields: &FieldPairs,
    ) -> Record {
        let mut body = Record::new();

        for arg in RECOGNIZED_ARGS {
            let from_caller = caller_args.get(*arg).filter(|v| !v.is_empty());
            if let Some(input) = from_caller {
                let value = match EnumField::from_column(arg) {
                    Some(field) => self.catalog.to_code(kind, field, input),
                    None => input.as_str(),
                };
                body.insert((*arg).to_string(), Value::String(value.to_string()));
            } else if let Some(default) = template.and_then(|t| t.get(*arg)) {
                body.insert((*arg).to_string(), Value::String(default.clone()));
            }
        }

        for ignored in caller_args.keys().filter(|k| !is_recognized_arg(k)) {
            tracing::debug!(arg = %ignored, "Ignoring unrecognized ticket argument");
        }

        insert_custom_fields(&mut body, custom_fields);
        body
    }

    /// Body for a generic table write: fields verbatim, then prefixed custom fields.
    pub fn generic_body(&self, fields: &FieldPairs, custom_fields: &FieldPairs) -> Record {
        let mut body: Record = fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        insert_custom_fields(&mut body, custom_fields);
        body
    }

    /// Project a raw ticket row onto the normalized ticket view.
    ///
    /// Keys absent (or null) upstream are absent from the result.
    pub fn normalize(&self, kind: &ResourceKind, record: &Record) -> NormalizedTicket {
        let opened_by = reference_id(record, "opened_by");

        NormalizedTicket {
            id: present(record, "sys_id"),
            summary: present(record, "short_description"),
            number: present(record, "number"),
            created_on: present(record, "sys_created_on"),
            active: present(record, "active"),
            additional_comments: present(record, "comments"),
            close_code: present(record, "close_code"),
            opened_at: present(record, "opened_at"),
            resolved_by: reference_id(record, "closed_by"),
            creator: opened_by.clone(),
            opened_by,
            assignee: reference_id(record, "assigned_to"),
            priority: self.enum_value(kind, record, EnumField::Priority),
            state: self.enum_value(kind, record, EnumField::State),
        }
    }

    pub fn normalize_all(&self, kind: &ResourceKind, records: &[Record]) -> Vec<NormalizedTicket> {
        records.iter().map(|r| self.normalize(kind, r)).collect()
    }

    /// Wider display projection; enum columns are always translated.
    pub fn human_readable(&self, kind: &ResourceKind, record: &Record) -> HumanReadableTicket {
        let label = |field: EnumField| {
            present(record, field.column())
                .map(|v| self.label_of(kind, field, &v))
        };

        HumanReadableTicket {
            number: present(record, "number"),
            system_id: present(record, "sys_id"),
            impact: label(EnumField::Impact),
            urgency: label(EnumField::Urgency),
            severity: label(EnumField::Severity),
            priority: label(EnumField::Priority),
            state: label(EnumField::State),
            created_on: present(record, "sys_created_on"),
            created_by: present(record, "sys_created_by"),
            active: present(record, "active"),
            close_notes: present(record, "close_notes"),
            close_code: present(record, "close_code"),
            description: present(record, "description"),
            opened_at: present(record, "opened_at"),
            due_date: present(record, "due_date"),
            resolved_by: present(record, "closed_by").map(|v| collapse_reference(&v)),
            resolved_at: present(record, "resolved_at"),
            sla_due: present(record, "sla_due"),
            short_description: present(record, "short_description"),
            additional_comments: present(record, "comments"),
        }
    }

    fn enum_value(&self, kind: &ResourceKind, record: &Record, field: EnumField) -> Option<String> {
        let raw = present(record, field.column())?;
        if self.legacy_field_format {
            Some(value_to_string(&raw))
        } else {
            Some(self.label_of(kind, field, &raw))
        }
    }

    fn label_of(&self, kind: &ResourceKind, field: EnumField, raw: &Value) -> String {
        let code = value_to_string(raw);
        self.catalog.to_label(kind, field, &code).to_string()
    }
}

/// Parse a `key=value;key=value` custom-field list.
///
/// Empty tokens are skipped. A token without `=` or with an empty key is
/// rejected. Everything after the first `=` is the value.
pub fn parse_custom_fields(raw: &str) -> GatewayResult<FieldPairs> {
    raw.split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(GatewayError::InvalidArgument(format!(
                "custom field '{token}' is not in key=value form"
            ))),
        })
        .collect()
}

/// The outbound name of a custom field.
pub fn custom_field_key(key: &str) -> String {
    if key.starts_with(CUSTOM_PREFIX) {
        key.to_string()
    } else {
        format!("{CUSTOM_PREFIX}{key}")
    }
}

fn insert_custom_fields(body: &mut Record, custom_fields: &FieldPairs) {
    for (key, value) in custom_fields {
        body.insert(custom_field_key(key), Value::String(value.clone()));
    }
}

fn present(record: &Record, key: &str) -> Option<Value> {
    record.get(key).filter(|v| !v.is_null()).cloned()
}

// A present field that is not a reference object maps to "".
fn reference_id(record: &Record, key: &str) -> Option<String> {
    let value = present(record, key)?;
    Some(Reference::from_value(&value).map(|r| r.value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn args(pairs: &[(&str, &str)]) -> TicketArgs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_caller_wins_over_template_and_is_translated() {
        let mapper = FieldMapper::default();
        let template: Template = args(&[("priority", "2"), ("category", "network")]);
        let body = mapper.build_body(
            &ResourceKind::Incident,
            &args(&[("priority", "1 - Critical")]),
            Some(&template),
            &Vec::new(),
        );
        assert_eq!(body["priority"], json!("1"));
        assert_eq!(body["category"], json!("network"));
    }

    #[test]
    fn test_empty_caller_arg_falls_back_to_template() {
        let mapper = FieldMapper::default();
        let template: Template = args(&[("urgency", "3")]);
        let body = mapper.build_body(
            &ResourceKind::Incident,
            &args(&[("urgency", "")]),
            Some(&template),
            &Vec::new(),
        );
        assert_eq!(body["urgency"], json!("3"));
    }

    #[test]
    fn test_state_translated_per_kind() {
        let mapper = FieldMapper::default();
        let body = mapper.build_body(
            &ResourceKind::ChangeRequest,
            &args(&[("state", "-1 - Implement"), ("impact", "2 - Medium")]),
            None,
            &Vec::new(),
        );
        assert_eq!(body["state"], json!("-1"));
        assert_eq!(body["impact"], json!("2"));
    }

    #[test]
    fn test_unrecognized_args_are_dropped() {
        let mapper = FieldMapper::default();
        let body = mapper.build_body(
            &ResourceKind::Incident,
            &args(&[("sys_id", "x"), ("short_description", "disk full")]),
            None,
            &Vec::new(),
        );
        assert_eq!(Value::Object(body), json!({"short_description": "disk full"}));
    }

    #[test]
    fn test_custom_fields_prefixed_and_win() {
        let mapper = FieldMapper::default();
        let custom = parse_custom_fields("priority=5;u_team=blue").unwrap();
        let body = mapper.build_body(
            &ResourceKind::Incident,
            &args(&[("priority", "1")]),
            None,
            &custom,
        );
        assert_eq!(body["priority"], json!("1"));
        assert_eq!(body["u_priority"], json!("5"));
        assert_eq!(body["u_team"], json!("blue"));
    }

    #[test]
    fn test_parse_custom_fields() {
        assert_eq!(
            parse_custom_fields("a=1; b=x=y ;;").unwrap(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "x=y".to_string())
            ]
        );
        assert!(parse_custom_fields("").unwrap().is_empty());
        assert!(matches!(
            parse_custom_fields("a=1;broken"),
            Err(GatewayError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_custom_fields("=1"),
            Err(GatewayError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_generic_body() {
        let mapper = FieldMapper::default();
        let fields = parse_custom_fields("name=router;priority=1").unwrap();
        let custom = parse_custom_fields("owner=ops").unwrap();
        let body = mapper.generic_body(&fields, &custom);
        assert_eq!(
            Value::Object(body),
            json!({"name": "router", "priority": "1", "u_owner": "ops"})
        );
    }

    #[test]
    fn test_normalize_translates_enums() {
        let mapper = FieldMapper::default();
        let raw = record(json!({"sys_id": "abc123", "priority": "1", "state": "2"}));
        let ticket = mapper.normalize(&ResourceKind::Incident, &raw);
        assert_eq!(
            serde_json::to_value(&ticket).unwrap(),
            json!({"ID": "abc123", "Priority": "1 - Critical", "State": "2 - In Progress"})
        );
    }

    #[test]
    fn test_normalize_legacy_keeps_codes() {
        let mapper = FieldMapper::new(true);
        let raw = record(json!({"priority": "1", "state": "2"}));
        let ticket = mapper.normalize(&ResourceKind::Incident, &raw);
        assert_eq!(ticket.priority.as_deref(), Some("1"));
        assert_eq!(ticket.state.as_deref(), Some("2"));
    }

    #[test]
    fn test_normalize_references() {
        let mapper = FieldMapper::default();
        let raw = record(json!({
            "opened_by": {"link": "https://x", "value": "u1"},
            "assigned_to": "",
            "closed_by": {"link": "https://x"}
        }));
        let ticket = mapper.normalize(&ResourceKind::Incident, &raw);
        assert_eq!(ticket.opened_by.as_deref(), Some("u1"));
        assert_eq!(ticket.creator.as_deref(), Some("u1"));
        assert_eq!(ticket.assignee.as_deref(), Some(""));
        assert_eq!(ticket.resolved_by.as_deref(), Some(""));
    }

    #[test]
    fn test_normalize_unknown_kind_passes_state_through() {
        let mapper = FieldMapper::default();
        let raw = record(json!({"state": "2", "priority": "2"}));
        let ticket = mapper.normalize(&ResourceKind::Other("u_tickets".to_string()), &raw);
        assert_eq!(ticket.state.as_deref(), Some("2"));
        assert_eq!(ticket.priority.as_deref(), Some("2 - High"));
    }

    #[test]
    fn test_human_readable() {
        let mapper = FieldMapper::new(true);
        let raw = record(json!({
            "sys_id": "1",
            "impact": "1",
            "urgency": "3",
            "state": "7",
            "closed_by": {"value": "u9"}
        }));
        let hr = mapper.human_readable(&ResourceKind::Incident, &raw);
        assert_eq!(hr.impact.as_deref(), Some("1 - High"));
        assert_eq!(hr.urgency.as_deref(), Some("3 - Low"));
        assert_eq!(hr.state.as_deref(), Some("7 - Closed"));
        assert_eq!(hr.resolved_by, Some(json!("u9")));
        assert_eq!(hr.description, None);
    }

    const OPTIONAL_FIELDS: [(&str, &str); 12] = [
        ("sys_id", "ID"),
        ("short_description", "Summary"),
        ("number", "Number"),
        ("sys_created_on", "CreatedOn"),
        ("active", "Active"),
        ("comments", "AdditionalComments"),
        ("close_code", "CloseCode"),
        ("opened_at", "OpenedAt"),
        ("closed_by", "ResolvedBy"),
        ("assigned_to", "Assignee"),
        ("priority", "Priority"),
        ("state", "State"),
    ];

    proptest! {
        #[test]
        fn prop_normalize_only_emits_present_keys(mask in proptest::collection::vec(any::<bool>(), 12)) {
            let mut raw = Record::new();
            for ((field, _), keep) in OPTIONAL_FIELDS.iter().zip(&mask) {
                if *keep {
                    raw.insert(field.to_string(), json!("1"));
                }
            }
            let ticket = FieldMapper::default().normalize(&ResourceKind::Incident, &raw);
            let out = serde_json::to_value(&ticket).unwrap();
            let out = out.as_object().unwrap();
            for ((field, key), keep) in OPTIONAL_FIELDS.iter().zip(&mask) {
                prop_assert_eq!(out.contains_key(*key), *keep, "field {}", field);
            }
        }

        #[test]
        fn prop_custom_keys_always_prefixed(key in "[a-z][a-z_]{0,12}", value in "[a-zA-Z0-9 ]{0,12}") {
            let mapper = FieldMapper::default();
            let custom = vec![(key.clone(), value.clone())];
            let body = mapper.generic_body(&Vec::new(), &custom);
            let expected = custom_field_key(&key);
            prop_assert!(expected.starts_with("u_"));
            prop_assert_eq!(body.get(&expected), Some(&Value::String(value)));
            prop_assert_eq!(body.len(), 1);
        }
    }
}
