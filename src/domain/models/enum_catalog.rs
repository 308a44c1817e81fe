//! Bidirectional code/label tables for ticket enum columns.
//!
//! The remote stores status, priority, severity, impact and urgency as
//! small integer codes. The catalog translates them to human-readable
//! labels and back. Both directions pass unknown input through unchanged,
//! so values outside the tables survive a round trip.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::resource_kind::ResourceKind;

const INCIDENT_STATES: &[(&str, &str)] = &[
    ("1", "1 - New"),
    ("2", "2 - In Progress"),
    ("3", "3 - On Hold"),
    ("4", "4 - Awaiting Caller"),
    ("5", "5 - Awaiting Evidence"),
    ("6", "6 - Resolved"),
    ("7", "7 - Closed"),
    ("8", "8 - Canceled"),
];

const PROBLEM_STATES: &[(&str, &str)] = &[
    ("1", "1 - Open"),
    ("2", "2 - Known Error"),
    ("3", "3 - Pending Change"),
    ("4", "4 - Closed/Resolved"),
];

const CHANGE_REQUEST_STATES: &[(&str, &str)] = &[
    ("-5", "-5 - New"),
    ("-4", "-4 - Assess"),
    ("-3", "-3 - Authorize"),
    ("-2", "-2 - Scheduled"),
    ("-1", "-1 - Implement"),
    ("0", "0 - Review"),
    ("3", "3 - Closed"),
    ("4", "4 - Canceled"),
];

const SC_TASK_STATES: &[(&str, &str)] = &[
    ("-5", "-5 - Pending"),
    ("1", "1 - Open"),
    ("2", "2 - Work In Progress"),
    ("3", "3 - Closed Complete"),
    ("4", "4 - Closed Incomplete"),
    ("7", "7 - Closed Skipped"),
];

const SC_REQUEST_STATES: &[(&str, &str)] = &[
    ("1", "1 - Approved"),
    ("3", "3 - Closed"),
    ("4", "4 - Rejected"),
];

// Shared by severity, impact and urgency.
const SEVERITY: &[(&str, &str)] = &[("1", "1 - High"), ("2", "2 - Medium"), ("3", "3 - Low")];

const PRIORITY: &[(&str, &str)] = &[
    ("1", "1 - Critical"),
    ("2", "2 - High"),
    ("3", "3 - Moderate"),
    ("4", "4 - Low"),
    ("5", "5 - Planning"),
];

const COMPUTER_STATUS: &[(&str, &str)] = &[
    ("1", "In use"),
    ("2", "On order"),
    ("3", "On maintenance"),
    ("6", "In stock/In transit"),
    ("7", "Retired"),
    ("100", "Missing"),
];

/// Enum-valued ticket columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumField {
    State,
    Priority,
    Severity,
    Impact,
    Urgency,
}

impl EnumField {
    pub const ALL: [EnumField; 5] = [
        Self::State,
        Self::Priority,
        Self::Severity,
        Self::Impact,
        Self::Urgency,
    ];

    /// The remote column name.
    pub fn column(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Priority => "priority",
            Self::Severity => "severity",
            Self::Impact => "impact",
            Self::Urgency => "urgency",
        }
    }

    /// Look up an enum column by its remote name.
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }
}

#[derive(Debug)]
struct CodeTable {
    entries: &'static [(&'static str, &'static str)],
    to_label: HashMap<&'static str, &'static str>,
    to_code: HashMap<&'static str, &'static str>,
}

impl CodeTable {
    fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            entries,
            to_label: entries.iter().copied().collect(),
            to_code: entries.iter().map(|(code, label)| (*label, *code)).collect(),
        }
    }
}

/// Read-only catalog of every code table, built once per process.
#[derive(Debug)]
pub struct EnumCatalog {
    severity: CodeTable,
    priority: CodeTable,
    incident: CodeTable,
    problem: CodeTable,
    change_request: CodeTable,
    sc_task: CodeTable,
    sc_request: CodeTable,
    computer_status: CodeTable,
}

static CATALOG: LazyLock<EnumCatalog> = LazyLock::new(|| EnumCatalog {
    severity: CodeTable::new(SEVERITY),
    priority: CodeTable::new(PRIORITY),
    incident: CodeTable::new(INCIDENT_STATES),
    problem: CodeTable::new(PROBLEM_STATES),
    change_request: CodeTable::new(CHANGE_REQUEST_STATES),
    sc_task: CodeTable::new(SC_TASK_STATES),
    sc_request: CodeTable::new(SC_REQUEST_STATES),
    computer_status: CodeTable::new(COMPUTER_STATUS),
});

impl EnumCatalog {
    /// The process-wide catalog.
    pub fn global() -> &'static EnumCatalog {
        &CATALOG
    }

    fn table(&self, kind: &ResourceKind, field: EnumField) -> Option<&CodeTable> {
        match field {
            EnumField::Severity | EnumField::Impact | EnumField::Urgency => Some(&self.severity),
            EnumField::Priority => Some(&self.priority),
            EnumField::State => match kind {
                ResourceKind::Incident => Some(&self.incident),
                ResourceKind::Problem => Some(&self.problem),
                ResourceKind::ChangeRequest => Some(&self.change_request),
                ResourceKind::ScTask => Some(&self.sc_task),
                ResourceKind::ScRequest => Some(&self.sc_request),
                ResourceKind::Other(_) => None,
            },
        }
    }

    /// Translate a code to its label, returning the input on a miss.
    pub fn to_label<'a>(&'a self, kind: &ResourceKind, field: EnumField, code: &'a str) -> &'a str {
        self.table(kind, field)
            .and_then(|t| t.to_label.get(code).copied())
            .unwrap_or(code)
    }

    /// Translate a label back to its code, returning the input on a miss.
    pub fn to_code<'a>(&'a self, kind: &ResourceKind, field: EnumField, label: &'a str) -> &'a str {
        self.table(kind, field)
            .and_then(|t| t.to_code.get(label).copied())
            .unwrap_or(label)
    }

    /// Every `(code, label)` pair for a column, in declaration order.
    pub fn entries(&self, kind: &ResourceKind, field: EnumField) -> &'static [(&'static str, &'static str)] {
        match self.table(kind, field) {
            Some(table) => table.entries,
            None => &[],
        }
    }

    /// Label for a configuration item's `install_status`.
    pub fn computer_status<'a>(&'a self, code: &'a str) -> &'a str {
        self.computer_status.to_label.get(code).copied().unwrap_or(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_translation() {
        let catalog = EnumCatalog::global();
        let kind = ResourceKind::Incident;
        assert_eq!(catalog.to_label(&kind, EnumField::Priority, "1"), "1 - Critical");
        assert_eq!(catalog.to_code(&kind, EnumField::Priority, "5 - Planning"), "5");
    }

    #[test]
    fn test_state_tables_are_per_kind() {
        let catalog = EnumCatalog::global();
        assert_eq!(
            catalog.to_label(&ResourceKind::Incident, EnumField::State, "3"),
            "3 - On Hold"
        );
        assert_eq!(
            catalog.to_label(&ResourceKind::ChangeRequest, EnumField::State, "3"),
            "3 - Closed"
        );
        assert_eq!(
            catalog.to_code(&ResourceKind::ScTask, EnumField::State, "-5 - Pending"),
            "-5"
        );
    }

    #[test]
    fn test_impact_and_urgency_share_severity_table() {
        let catalog = EnumCatalog::global();
        let kind = ResourceKind::Problem;
        assert_eq!(catalog.to_label(&kind, EnumField::Impact, "2"), "2 - Medium");
        assert_eq!(catalog.to_code(&kind, EnumField::Urgency, "3 - Low"), "3");
    }

    #[test]
    fn test_miss_passes_through() {
        let catalog = EnumCatalog::global();
        assert_eq!(catalog.to_label(&ResourceKind::Incident, EnumField::Priority, "9"), "9");
        assert_eq!(
            catalog.to_code(&ResourceKind::Incident, EnumField::State, "Mystery"),
            "Mystery"
        );
        let other = ResourceKind::Other("u_custom".to_string());
        assert_eq!(catalog.to_label(&other, EnumField::State, "1"), "1");
        assert!(catalog.entries(&other, EnumField::State).is_empty());
    }

    #[test]
    fn test_round_trip_every_entry() {
        let catalog = EnumCatalog::global();
        for kind in ResourceKind::KNOWN {
            for field in EnumField::ALL {
                for (code, _) in catalog.entries(&kind, field) {
                    let label = catalog.to_label(&kind, field, code);
                    assert_eq!(catalog.to_code(&kind, field, label), *code);
                }
            }
        }
    }

    #[test]
    fn test_enum_field_columns() {
        assert_eq!(EnumField::from_column("urgency"), Some(EnumField::Urgency));
        assert_eq!(EnumField::from_column("short_description"), None);
    }

    #[test]
    fn test_computer_status() {
        let catalog = EnumCatalog::global();
        assert_eq!(catalog.computer_status("100"), "Missing");
        assert_eq!(catalog.computer_status("42"), "42");
    }
}
