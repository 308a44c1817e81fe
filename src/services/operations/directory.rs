//! User, group and computer lookups.

use serde::Serialize;
use serde_json::Value;

use crate::domain::errors::GatewayResult;
use crate::domain::models::record::{collapse_reference, value_to_string, Record};
use crate::domain::models::EnumCatalog;
use crate::services::gateway::GetSelector;

use super::{given, OperationExecutor, OperationOutcome};

const USER_TABLE: &str = "sys_user";
const GROUP_TABLE: &str = "sys_user_group";
const COMPUTER_TABLE: &str = "cmdb_ci_computer";

/// Selector shared by the directory lookups.
///
/// `id` wins, then `name` (or `asset_tag` for computers) as an equality
/// filter, then the raw `query`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryArgs {
    pub id: Option<String>,
    pub name: Option<String>,
    pub asset_tag: Option<String>,
    pub query: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserEntry {
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupEntry {
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComputerEntry {
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_tag: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_group: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub cost: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DirectoryListing {
    Users(Vec<UserEntry>),
    Groups(Vec<GroupEntry>),
    Computers(Vec<ComputerEntry>),
}

fn text(record: &Record, key: &str) -> String {
    record.get(key).map(value_to_string).unwrap_or_default()
}

fn field(record: &Record, key: &str) -> Option<Value> {
    record.get(key).filter(|v| !v.is_null()).cloned()
}

fn reference(record: &Record, key: &str) -> Option<Value> {
    field(record, key).map(|v| collapse_reference(&v))
}

impl UserEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            id: field(record, "sys_id"),
            name: format!("{} {}", text(record, "first_name"), text(record, "last_name"))
                .trim_end()
                .to_string(),
            user_name: field(record, "user_name"),
            email: field(record, "email"),
            created: field(record, "sys_created_on"),
            updated: field(record, "sys_updated_on"),
        }
    }
}

impl GroupEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            id: field(record, "sys_id"),
            description: field(record, "description"),
            name: field(record, "name"),
            active: field(record, "active"),
            manager: reference(record, "manager"),
            updated: field(record, "sys_updated_on"),
        }
    }
}

impl ComputerEntry {
    fn from_record(record: &Record) -> Self {
        let state = field(record, "install_status").map(|status| {
            let code = value_to_string(&status);
            EnumCatalog::global().computer_status(&code).to_string()
        });

        Self {
            id: field(record, "sys_id"),
            asset_tag: field(record, "asset_tag"),
            name: field(record, "name"),
            display_name: format!("{} - {}", text(record, "asset_tag"), text(record, "name")),
            support_group: field(record, "support_group"),
            operating_system: field(record, "os"),
            company: reference(record, "company"),
            assigned_to: reference(record, "assigned_to"),
            state,
            cost: format!("{} {}", text(record, "cost"), text(record, "cost_cc"))
                .trim_end()
                .to_string(),
            comments: field(record, "comments"),
        }
    }
}

impl OperationExecutor {
    /// Rows for a directory lookup: by id, else by equality filter, else by raw query.
    async fn directory_rows(
        &self,
        table: &str,
        args: &DirectoryArgs,
        equality: Option<String>,
    ) -> GatewayResult<Vec<Record>> {
        if let Some(id) = given(&args.id) {
            let payload = self.gateway.get(table, &GetSelector::by_id(id)).await?;
            return Ok(payload.records());
        }

        let filter = equality.or_else(|| given(&args.query).map(str::to_string));
        self.gateway
            .query(table, args.limit, args.offset, filter.as_deref())
            .await
    }

    pub(super) async fn query_users(&self, args: DirectoryArgs) -> GatewayResult<OperationOutcome> {
        let equality = given(&args.name).map(|n| format!("user_name={n}"));
        let rows = self.directory_rows(USER_TABLE, &args, equality).await?;
        if rows.is_empty() {
            return Ok(OperationOutcome::Empty("No users found".to_string()));
        }
        Ok(OperationOutcome::Directory(DirectoryListing::Users(
            rows.iter().map(UserEntry::from_record).collect(),
        )))
    }

    pub(super) async fn query_groups(&self, args: DirectoryArgs) -> GatewayResult<OperationOutcome> {
        let equality = given(&args.name).map(|n| format!("name={n}"));
        let rows = self.directory_rows(GROUP_TABLE, &args, equality).await?;
        if rows.is_empty() {
            return Ok(OperationOutcome::Empty("No groups found".to_string()));
        }
        Ok(OperationOutcome::Directory(DirectoryListing::Groups(
            rows.iter().map(GroupEntry::from_record).collect(),
        )))
    }

    pub(super) async fn query_computers(
        &self,
        args: DirectoryArgs,
    ) -> GatewayResult<OperationOutcome> {
        let equality = given(&args.name)
            .map(|n| format!("name={n}"))
            .or_else(|| given(&args.asset_tag).map(|t| format!("asset_tag={t}")));
        let rows = self.directory_rows(COMPUTER_TABLE, &args, equality).await?;
        if rows.is_empty() {
            return Ok(OperationOutcome::Empty("No computers found".to_string()));
        }
        Ok(OperationOutcome::Directory(DirectoryListing::Computers(
            rows.iter().map(ComputerEntry::from_record).collect(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_user_name_joins_first_and_last() {
        let user = UserEntry::from_record(&record(json!({
            "sys_id": "u1",
            "first_name": "Ada",
            "user_name": "ada"
        })));
        assert_eq!(user.name, "Ada");
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"ID": "u1", "Name": "Ada", "UserName": "ada"})
        );
    }

    #[test]
    fn test_group_manager_reference_collapsed() {
        let group = GroupEntry::from_record(&record(json!({
            "name": "Network",
            "manager": {"link": "https://x", "value": "m1"}
        })));
        assert_eq!(group.manager, Some(json!("m1")));
    }

    #[test]
    fn test_computer_mapping() {
        let computer = ComputerEntry::from_record(&record(json!({
            "sys_id": "c1",
            "asset_tag": "P1000",
            "name": "laptop-7",
            "install_status": "7",
            "cost": "1200",
            "cost_cc": "USD",
            "company": {"value": "acme"}
        })));
        assert_eq!(computer.display_name, "P1000 - laptop-7");
        assert_eq!(computer.state.as_deref(), Some("Retired"));
        assert_eq!(computer.cost, "1200 USD");
        assert_eq!(computer.company, Some(json!("acme")));

        let bare = ComputerEntry::from_record(&record(json!({"install_status": "42"})));
        assert_eq!(bare.state.as_deref(), Some("42"));
        assert_eq!(bare.cost, "");
    }
}
