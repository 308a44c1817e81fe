//! Generic table record CLI commands.

use clap::{Args, Subcommand};

use crate::services::operations::{
    CreateRecordArgs, DeleteRecordArgs, GetRecordArgs, GetTableNameArgs, ListTableFieldsArgs,
    Operation, QueryTableArgs, UpdateRecordArgs,
};

#[derive(Args, Debug)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub command: RecordCommands,
}

#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// Retrieve a record from any table
    Get {
        /// Table name, e.g. cmdb_ci_server
        table: String,
        /// Record system ID
        id: String,
        /// Fields to return (comma-separated); audit fields when omitted
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    /// Query a table
    Query {
        table: String,
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    /// Create a record
    Create {
        table: String,
        /// Fields, format: "key=value;key=value"
        #[arg(short, long)]
        fields: Option<String>,
        /// Custom fields, format: "key=value;key=value"
        #[arg(long)]
        custom_fields: Option<String>,
    },
    /// Update a record
    Update {
        table: String,
        id: String,
        #[arg(short, long)]
        fields: Option<String>,
        #[arg(long)]
        custom_fields: Option<String>,
    },
    /// Delete a record
    Delete { table: String, id: String },
    /// List a table's fields from a sample record
    Fields { table: String },
    /// Look up table system names by label
    TableName {
        /// Table label, e.g. "Incident"
        label: String,
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
}

impl From<RecordArgs> for Operation {
    fn from(args: RecordArgs) -> Self {
        match args.command {
            RecordCommands::Get { table, id, fields } => Operation::GetRecord(GetRecordArgs {
                table_name: table,
                id,
                fields,
            }),
            RecordCommands::Query {
                table,
                query,
                limit,
                offset,
                fields,
            } => Operation::QueryTable(QueryTableArgs {
                table_name: table,
                limit,
                offset,
                query,
                fields,
            }),
            RecordCommands::Create {
                table,
                fields,
                custom_fields,
            } => Operation::CreateRecord(CreateRecordArgs {
                table_name: table,
                fields,
                custom_fields,
            }),
            RecordCommands::Update {
                table,
                id,
                fields,
                custom_fields,
            } => Operation::UpdateRecord(UpdateRecordArgs {
                table_name: table,
                id,
                fields,
                custom_fields,
            }),
            RecordCommands::Delete { table, id } => Operation::DeleteRecord(DeleteRecordArgs {
                table_name: table,
                id,
            }),
            RecordCommands::Fields { table } => {
                Operation::ListTableFields(ListTableFieldsArgs { table_name: table })
            }
            RecordCommands::TableName {
                label,
                limit,
                offset,
            } => Operation::GetTableName(GetTableNameArgs {
                label,
                limit,
                offset,
            }),
        }
    }
}
