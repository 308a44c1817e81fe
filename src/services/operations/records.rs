//! Generic table operations.

use serde::Serialize;
use serde_json::Value;

use crate::domain::errors::GatewayResult;
use crate::domain::models::record::{audit_projection, field_projection, Record};
use crate::services::field_mapper::parse_custom_fields;
use crate::services::gateway::GetSelector;

use super::{given, OperationExecutor, OperationOutcome, TableFields};

const TABLE_CATALOG: &str = "sys_db_object";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetRecordArgs {
    pub table_name: String,
    pub id: String,
    /// Project onto these fields; the audit fields when empty.
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTableArgs {
    pub table_name: String,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub query: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRecordArgs {
    pub table_name: String,
    /// `key=value;key=value`, sent verbatim.
    pub fields: Option<String>,
    /// `key=value;key=value`, sent with a `u_` prefix.
    pub custom_fields: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRecordArgs {
    pub table_name: String,
    pub id: String,
    pub fields: Option<String>,
    pub custom_fields: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteRecordArgs {
    pub table_name: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTableFieldsArgs {
    pub table_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetTableNameArgs {
    pub label: String,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// A row of the table catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableEntry {
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(rename = "SystemName", skip_serializing_if = "Option::is_none")]
    pub system_name: Option<Value>,
}

impl TableEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            id: record.get("sys_id").cloned(),
            name: record.get("name").cloned(),
            system_name: record.get("sys_name").cloned(),
        }
    }
}

fn project(record: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        audit_projection(record)
    } else {
        field_projection(record, fields)
    }
}

impl OperationExecutor {
    pub(super) async fn get_record(&self, args: GetRecordArgs) -> GatewayResult<OperationOutcome> {
        let payload = self
            .gateway
            .get(&args.table_name, &GetSelector::by_id(args.id))
            .await?;

        Ok(match payload.first() {
            Some(record) => OperationOutcome::Record(project(&record, &args.fields)),
            None => OperationOutcome::Empty("Cannot find record".to_string()),
        })
    }

    pub(super) async fn query_table(&self, args: QueryTableArgs) -> GatewayResult<OperationOutcome> {
        let rows = self
            .gateway
            .query(&args.table_name, args.limit, args.offset, given(&args.query))
            .await?;

        if rows.is_empty() {
            return Ok(OperationOutcome::Empty("No results found".to_string()));
        }

        Ok(OperationOutcome::Records(
            rows.iter().map(|r| project(r, &args.fields)).collect(),
        ))
    }

    pub(super) async fn create_record(
        &self,
        args: CreateRecordArgs,
    ) -> GatewayResult<OperationOutcome> {
        let fields = parse_custom_fields(given(&args.fields).unwrap_or_default())?;
        let custom = parse_custom_fields(given(&args.custom_fields).unwrap_or_default())?;
        let body = self.mapper.generic_body(&fields, &custom);

        let created = self.gateway.create(&args.table_name, &body).await?;
        Ok(OperationOutcome::Record(audit_projection(&created)))
    }

    pub(super) async fn update_record(
        &self,
        args: UpdateRecordArgs,
    ) -> GatewayResult<OperationOutcome> {
        let fields = parse_custom_fields(given(&args.fields).unwrap_or_default())?;
        let custom = parse_custom_fields(given(&args.custom_fields).unwrap_or_default())?;
        let body = self.mapper.generic_body(&fields, &custom);

        let updated = self
            .gateway
            .update(&args.table_name, &args.id, &body)
            .await?;
        Ok(OperationOutcome::Record(audit_projection(&updated)))
    }

    pub(super) async fn delete_record(
        &self,
        args: DeleteRecordArgs,
    ) -> GatewayResult<OperationOutcome> {
        self.gateway.delete(&args.table_name, &args.id).await?;
        Ok(OperationOutcome::Deleted(format!(
            "Record with ID {} was successfully deleted.",
            args.id
        )))
    }

    pub(super) async fn list_table_fields(
        &self,
        args: ListTableFieldsArgs,
    ) -> GatewayResult<OperationOutcome> {
        let payload = self.gateway.sample(&args.table_name).await?;

        Ok(match payload.first() {
            Some(sample) => OperationOutcome::Fields(TableFields {
                table: args.table_name,
                fields: sample.keys().cloned().collect(),
            }),
            None => OperationOutcome::Empty("Table contains no records".to_string()),
        })
    }

    pub(super) async fn table_name(&self, args: GetTableNameArgs) -> GatewayResult<OperationOutcome> {
        let filter = format!("label={}", args.label);
        let rows = self
            .gateway
            .query(TABLE_CATALOG, args.limit, args.offset, Some(&filter))
            .await?;

        if rows.is_empty() {
            return Ok(OperationOutcome::Empty("Cannot find table".to_string()));
        }

        Ok(OperationOutcome::Tables(
            rows.iter().map(TableEntry::from_record).collect(),
        ))
    }
}
