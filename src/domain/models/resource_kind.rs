//! Resource kinds: the well-known ticket tables and the generic case.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The table a ticket operation targets.
///
/// Known kinds carry their own status-code table in the
/// [`EnumCatalog`](super::enum_catalog::EnumCatalog); any other table name
/// maps to [`ResourceKind::Other`] and gets pass-through translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ResourceKind {
    Incident,
    Problem,
    ChangeRequest,
    ScTask,
    ScRequest,
    Other(String),
}

impl Default for ResourceKind {
    fn default() -> Self {
        Self::Incident
    }
}

impl ResourceKind {
    /// All known ticket kinds.
    pub const KNOWN: [ResourceKind; 5] = [
        Self::Incident,
        Self::Problem,
        Self::ChangeRequest,
        Self::ScTask,
        Self::ScRequest,
    ];

    /// Resolve a table name to a kind.
    pub fn from_table(name: &str) -> Self {
        match name {
            "incident" => Self::Incident,
            "problem" => Self::Problem,
            "change_request" => Self::ChangeRequest,
            "sc_task" => Self::ScTask,
            "sc_request" => Self::ScRequest,
            other => Self::Other(other.to_string()),
        }
    }

    /// The remote table name.
    pub fn table_name(&self) -> &str {
        match self {
            Self::Incident => "incident",
            Self::Problem => "problem",
            Self::ChangeRequest => "change_request",
            Self::ScTask => "sc_task",
            Self::ScRequest => "sc_request",
            Self::Other(name) => name,
        }
    }

    /// Label used when naming emitted poll events.
    pub fn display_label(&self) -> &str {
        match self {
            Self::Incident => "Incident",
            Self::Problem => "Problem",
            Self::ChangeRequest => "Change Request",
            Self::ScTask => "Catalog Task",
            Self::ScRequest => "Catalog Request",
            Self::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl From<String> for ResourceKind {
    fn from(name: String) -> Self {
        Self::from_table(&name)
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.table_name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_round_trip() {
        for kind in ResourceKind::KNOWN {
            assert_eq!(ResourceKind::from_table(kind.table_name()), kind);
            assert!(kind.is_known());
        }
    }

    #[test]
    fn test_unknown_table_is_other() {
        let kind = ResourceKind::from_table("cmdb_ci_computer");
        assert_eq!(kind, ResourceKind::Other("cmdb_ci_computer".to_string()));
        assert_eq!(kind.table_name(), "cmdb_ci_computer");
        assert!(!kind.is_known());
    }

    #[test]
    fn test_serde_uses_table_name() {
        let json = serde_json::to_string(&ResourceKind::ChangeRequest).unwrap();
        assert_eq!(json, "\"change_request\"");
        let back: ResourceKind = serde_json::from_str("\"sc_task\"").unwrap();
        assert_eq!(back, ResourceKind::ScTask);
    }
}
