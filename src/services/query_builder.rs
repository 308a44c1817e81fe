//! Query-string construction for the table API's filter grammar.
//!
//! Filter terms are joined with `^` (AND); `^OR` inside a term binds to the
//! previous comparison; a leading `ORDERBY<field>` term sorts ascending.
//! Caller-supplied filter strings are passed through verbatim: nothing here
//! escapes `^` or validates field names.

use std::collections::BTreeMap;

use crate::domain::ports::QueryParams;

pub const PARAM_LIMIT: &str = "sysparm_limit";
pub const PARAM_OFFSET: &str = "sysparm_offset";
pub const PARAM_QUERY: &str = "sysparm_query";

/// Builds `sysparm_*` parameter lists, filling in configured defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryBuilder {
    default_limit: u32,
    default_offset: u32,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(10, 0)
    }
}

impl QueryBuilder {
    pub fn new(default_limit: u32, default_offset: u32) -> Self {
        Self {
            default_limit,
            default_offset,
        }
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Serialize an (order, filter terms, limit, offset) tuple.
    ///
    /// Limit and offset are always present, even without a filter.
    pub fn build(
        &self,
        order_by: Option<&str>,
        terms: &[&str],
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> QueryParams {
        let mut params = vec![
            (
                PARAM_LIMIT.to_string(),
                limit.unwrap_or(self.default_limit).to_string(),
            ),
            (
                PARAM_OFFSET.to_string(),
                offset.unwrap_or(self.default_offset).to_string(),
            ),
        ];
        if let Some(filter) = compose_filter(order_by, terms) {
            params.push((PARAM_QUERY.to_string(), filter));
        }
        params
    }

    /// Single-row lookup of a server-side template by name.
    pub fn template_lookup(name: &str) -> QueryParams {
        vec![
            (PARAM_LIMIT.to_string(), "1".to_string()),
            (PARAM_QUERY.to_string(), format!("name={name}")),
        ]
    }
}

/// Join filter terms with `^`, prefixed by `ORDERBY<field>` when ordering.
///
/// Empty terms are dropped; `None` when nothing remains.
pub fn compose_filter(order_by: Option<&str>, terms: &[&str]) -> Option<String> {
    let mut parts: Vec<String> = Vec::with_capacity(terms.len() + 1);
    if let Some(field) = order_by.filter(|f| !f.is_empty()) {
        parts.push(format!("ORDERBY{field}"));
    }
    parts.extend(
        terms
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| (*t).to_string()),
    );

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("^"))
    }
}

/// The "changed since checkpoint" filter of a poll cycle.
///
/// `<base>^ORDERBY<field>^<field>><checkpoint>`; the comparison is strictly
/// greater, so a record stamped exactly at the checkpoint is excluded.
pub fn changed_since(base_filter: Option<&str>, timestamp_field: &str, checkpoint: &str) -> String {
    let window = format!("ORDERBY{timestamp_field}^{timestamp_field}>{checkpoint}");
    match base_filter.filter(|b| !b.is_empty()) {
        Some(base) => format!("{base}^{window}"),
        None => window,
    }
}

/// Parse a stored template string (`k=v^k=v^...^EQ`).
///
/// The final segment is the grammar's terminator and is ignored, as are
/// segments without `=`.
pub fn parse_template(raw: &str) -> BTreeMap<String, String> {
    let segments: Vec<&str> = raw.split('^').collect();
    let body = &segments[..segments.len().saturating_sub(1)];
    body.iter()
        .filter_map(|segment| segment.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_build_always_sets_limit_and_offset() {
        let params = QueryBuilder::default().build(None, &[], None, None);
        assert_eq!(param(&params, PARAM_LIMIT), Some("10"));
        assert_eq!(param(&params, PARAM_OFFSET), Some("0"));
        assert_eq!(param(&params, PARAM_QUERY), None);
    }

    #[test]
    fn test_build_with_order_and_terms() {
        let params = QueryBuilder::new(25, 5).build(
            Some("opened_at"),
            &["active=true", "priority=1"],
            Some(3),
            None,
        );
        assert_eq!(param(&params, PARAM_LIMIT), Some("3"));
        assert_eq!(param(&params, PARAM_OFFSET), Some("5"));
        assert_eq!(
            param(&params, PARAM_QUERY),
            Some("ORDERBYopened_at^active=true^priority=1")
        );
    }

    #[test]
    fn test_raw_filter_passes_through_verbatim() {
        let raw = "element_id=1^element=comments^ORelement=work_notes";
        assert_eq!(compose_filter(None, &[raw]).as_deref(), Some(raw));
    }

    #[test]
    fn test_compose_filter_empty() {
        assert_eq!(compose_filter(None, &[]), None);
        assert_eq!(compose_filter(Some(""), &[""]), None);
    }

    #[test]
    fn test_changed_since() {
        assert_eq!(
            changed_since(None, "opened_at", "2024-01-15 10:30:00"),
            "ORDERBYopened_at^opened_at>2024-01-15 10:30:00"
        );
        assert_eq!(
            changed_since(Some("active=true"), "sys_updated_on", "2024-01-15 10:30:00"),
            "active=true^ORDERBYsys_updated_on^sys_updated_on>2024-01-15 10:30:00"
        );
    }

    #[test]
    fn test_template_lookup() {
        let params = QueryBuilder::template_lookup("Network outage");
        assert_eq!(param(&params, PARAM_LIMIT), Some("1"));
        assert_eq!(param(&params, PARAM_QUERY), Some("name=Network outage"));
    }

    #[test]
    fn test_parse_template_drops_terminator() {
        let template = parse_template("priority=2^short_description=Outage^category=network^EQ");
        assert_eq!(template.len(), 3);
        assert_eq!(template["priority"], "2");
        assert_eq!(template["category"], "network");

        assert!(parse_template("").is_empty());
        assert!(parse_template("priority=2").is_empty());
    }
}
