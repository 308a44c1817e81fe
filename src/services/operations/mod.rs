//! Host-facing operations.
//!
//! Every command the adapter supports is one [`Operation`] variant with a
//! typed argument struct. [`OperationExecutor::execute`] runs it against
//! the gateway and returns an [`OperationOutcome`]. "Not found" and "no
//! results" are [`OperationOutcome::Empty`], never errors.

mod directory;
mod records;
mod tickets;

use std::sync::Arc;

use serde::Serialize;

use crate::domain::errors::GatewayResult;
use crate::domain::models::record::Record;
use crate::domain::models::{
    AttachmentFile, Config, DefaultsConfig, FetchConfig, HumanReadableTicket, NormalizedTicket,
    PollBatch, ResourceKind, TicketNote,
};
use crate::domain::ports::CheckpointStore;

use super::field_mapper::FieldMapper;
use super::gateway::ResourceGateway;
use super::poller::{IncrementalPoller, PollSettings};
use super::probe::ConnectivityProbe;

pub use directory::{ComputerEntry, DirectoryArgs, DirectoryListing, GroupEntry, UserEntry};
pub use records::{
    CreateRecordArgs, DeleteRecordArgs, GetRecordArgs, GetTableNameArgs, ListTableFieldsArgs,
    QueryTableArgs, TableEntry, UpdateRecordArgs,
};
pub use tickets::{
    AddCommentArgs, AddLinkArgs, CreateTicketArgs, DeleteTicketArgs, GetTicketArgs,
    QueryTicketsArgs, TicketNotesArgs, UpdateTicketArgs, UploadFileArgs, UploadedFile,
};

/// The closed set of supported commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    GetTicket(GetTicketArgs),
    CreateTicket(CreateTicketArgs),
    UpdateTicket(UpdateTicketArgs),
    DeleteTicket(DeleteTicketArgs),
    AddLink(AddLinkArgs),
    AddComment(AddCommentArgs),
    GetTicketNotes(TicketNotesArgs),
    QueryTickets(QueryTicketsArgs),
    UploadFile(UploadFileArgs),
    GetRecord(GetRecordArgs),
    QueryTable(QueryTableArgs),
    CreateRecord(CreateRecordArgs),
    UpdateRecord(UpdateRecordArgs),
    DeleteRecord(DeleteRecordArgs),
    ListTableFields(ListTableFieldsArgs),
    GetTableName(GetTableNameArgs),
    QueryUsers(DirectoryArgs),
    QueryGroups(DirectoryArgs),
    QueryComputers(DirectoryArgs),
    FetchIncidents,
    TestModule,
}

impl Operation {
    /// Command name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetTicket(_) => "get-ticket",
            Self::CreateTicket(_) => "create-ticket",
            Self::UpdateTicket(_) => "update-ticket",
            Self::DeleteTicket(_) => "delete-ticket",
            Self::AddLink(_) => "add-link",
            Self::AddComment(_) => "add-comment",
            Self::GetTicketNotes(_) => "get-ticket-notes",
            Self::QueryTickets(_) => "query-tickets",
            Self::UploadFile(_) => "upload-file",
            Self::GetRecord(_) => "get-record",
            Self::QueryTable(_) => "query-table",
            Self::CreateRecord(_) => "create-record",
            Self::UpdateRecord(_) => "update-record",
            Self::DeleteRecord(_) => "delete-record",
            Self::ListTableFields(_) => "list-table-fields",
            Self::GetTableName(_) => "get-table-name",
            Self::QueryUsers(_) => "query-users",
            Self::QueryGroups(_) => "query-groups",
            Self::QueryComputers(_) => "query-computers",
            Self::FetchIncidents => "fetch-incidents",
            Self::TestModule => "test-module",
        }
    }
}

/// A ticket in both its normalized and display projections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketView {
    #[serde(flatten)]
    pub ticket: NormalizedTicket,
    #[serde(skip)]
    pub display: HumanReadableTicket,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentFile>,
}

/// Journal entries of one ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketNotes {
    #[serde(rename = "ID")]
    pub ticket_id: String,
    #[serde(rename = "Note")]
    pub notes: Vec<TicketNote>,
}

/// Column names of a table, read from one sample row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFields {
    pub table: String,
    pub fields: Vec<String>,
}

/// Result of an [`Operation`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum OperationOutcome {
    Ticket(TicketView),
    Tickets(Vec<TicketView>),
    Record(Record),
    Records(Vec<Record>),
    Deleted(String),
    Notes(TicketNotes),
    Attachment(UploadedFile),
    Fields(TableFields),
    Tables(Vec<TableEntry>),
    Directory(DirectoryListing),
    Batch(PollBatch),
    Probe(String),
    /// A valid empty outcome, e.g. "No results found".
    Empty(String),
}

impl OperationOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}

/// Runs operations against one configured instance.
pub struct OperationExecutor {
    gateway: ResourceGateway,
    mapper: FieldMapper,
    defaults: DefaultsConfig,
    fetch: FetchConfig,
    checkpoints: Arc<dyn CheckpointStore>,
}

impl OperationExecutor {
    pub fn new(
        gateway: ResourceGateway,
        mapper: FieldMapper,
        defaults: DefaultsConfig,
        fetch: FetchConfig,
        checkpoints: Arc<dyn CheckpointStore>,
    ) -> Self {
        Self {
            gateway,
            mapper,
            defaults,
            fetch,
            checkpoints,
        }
    }

    pub fn from_config(
        config: &Config,
        gateway: ResourceGateway,
        checkpoints: Arc<dyn CheckpointStore>,
    ) -> Self {
        Self::new(
            gateway,
            FieldMapper::new(config.legacy_field_format),
            config.defaults.clone(),
            config.fetch.clone(),
            checkpoints,
        )
    }

    pub async fn execute(&self, operation: Operation) -> GatewayResult<OperationOutcome> {
        let name = operation.name();
        tracing::debug!(operation = name, "Executing operation");

        let outcome = match operation {
            Operation::GetTicket(args) => self.get_ticket(args).await,
            Operation::CreateTicket(args) => self.create_ticket(args).await,
            Operation::UpdateTicket(args) => self.update_ticket(args).await,
            Operation::DeleteTicket(args) => self.delete_ticket(args).await,
            Operation::AddLink(args) => self.add_link(args).await,
            Operation::AddComment(args) => self.add_comment(args).await,
            Operation::GetTicketNotes(args) => self.ticket_notes(args).await,
            Operation::QueryTickets(args) => self.query_tickets(args).await,
            Operation::UploadFile(args) => self.upload_file(args).await,
            Operation::GetRecord(args) => self.get_record(args).await,
            Operation::QueryTable(args) => self.query_table(args).await,
            Operation::CreateRecord(args) => self.create_record(args).await,
            Operation::UpdateRecord(args) => self.update_record(args).await,
            Operation::DeleteRecord(args) => self.delete_record(args).await,
            Operation::ListTableFields(args) => self.list_table_fields(args).await,
            Operation::GetTableName(args) => self.table_name(args).await,
            Operation::QueryUsers(args) => self.query_users(args).await,
            Operation::QueryGroups(args) => self.query_groups(args).await,
            Operation::QueryComputers(args) => self.query_computers(args).await,
            Operation::FetchIncidents => self.fetch_incidents().await,
            Operation::TestModule => self.test_module().await,
        };

        if let Err(err) = &outcome {
            tracing::warn!(operation = name, error = %err, "Operation failed");
        }
        outcome
    }

    /// Ticket table for a command: the explicit argument, else the configured default.
    fn kind(&self, ticket_type: Option<&str>) -> ResourceKind {
        let table = ticket_type
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.defaults.ticket_type);
        ResourceKind::from_table(table)
    }

    fn ticket_view(
        &self,
        kind: &ResourceKind,
        record: &Record,
        attachments: Vec<AttachmentFile>,
    ) -> TicketView {
        TicketView {
            ticket: self.mapper.normalize(kind, record),
            display: self.mapper.human_readable(kind, record),
            attachments,
        }
    }

    async fn fetch_incidents(&self) -> GatewayResult<OperationOutcome> {
        let settings = PollSettings::from_config(&self.fetch)?;
        let poller =
            IncrementalPoller::new(self.gateway.clone(), Arc::clone(&self.checkpoints), settings);
        Ok(OperationOutcome::Batch(poller.poll_once().await?))
    }

    async fn test_module(&self) -> GatewayResult<OperationOutcome> {
        let status = ConnectivityProbe::new(&self.gateway, &self.fetch).run().await?;
        Ok(OperationOutcome::Probe(status.to_string()))
    }
}

/// Empty option strings count as absent.
fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
