//! Ticket operations.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::record::{value_to_string, Record};
use crate::domain::models::{NoteType, TicketNote};
use crate::services::field_mapper::{parse_custom_fields, TicketArgs};
use crate::services::gateway::GetSelector;

use super::{given, OperationExecutor, OperationOutcome, TicketNotes};

const JOURNAL_TABLE: &str = "sys_journal_field";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetTicketArgs {
    pub ticket_type: Option<String>,
    pub id: Option<String>,
    pub number: Option<String>,
    /// `key=value,key=value` equality filter.
    pub custom_fields: Option<String>,
    pub get_attachments: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateTicketArgs {
    pub ticket_type: Option<String>,
    /// Recognized ticket columns; enum columns may be given as labels.
    pub fields: TicketArgs,
    pub template: Option<String>,
    /// `key=value;key=value`, sent with a `u_` prefix.
    pub custom_fields: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTicketArgs {
    pub ticket_type: Option<String>,
    pub id: String,
    pub fields: TicketArgs,
    pub template: Option<String>,
    pub custom_fields: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteTicketArgs {
    pub ticket_type: Option<String>,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddLinkArgs {
    pub ticket_type: Option<String>,
    pub id: String,
    pub link: String,
    /// Anchor text; the link itself when absent.
    pub text: Option<String>,
    /// Post to `comments` instead of `work_notes`.
    pub post_as_comment: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddCommentArgs {
    pub ticket_type: Option<String>,
    pub id: String,
    pub comment: String,
    pub post_as_comment: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketNotesArgs {
    pub id: String,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTicketsArgs {
    pub ticket_type: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Raw filter expression, passed through verbatim.
    pub query: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFileArgs {
    pub ticket_type: Option<String>,
    pub id: String,
    pub file_path: PathBuf,
    /// Name reported to the remote; the local file name when absent.
    pub file_name: Option<String>,
}

/// Attachment metadata returned by an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    #[serde(rename = "ID")]
    pub ticket_id: String,
    #[serde(rename = "Filename")]
    pub file_name: String,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "SystemID")]
    pub system_id: String,
}

fn journal_key(post_as_comment: bool) -> &'static str {
    if post_as_comment {
        "comments"
    } else {
        "work_notes"
    }
}

/// Journal markup for a clickable link.
pub(crate) fn link_markup(link: &str, text: &str) -> String {
    format!(r#"[code]<a class="web" target="_blank" href="{link}" >{text}</a>[/code]"#)
}

fn note_from(record: &Record) -> TicketNote {
    let element = record.get("element").map(value_to_string).unwrap_or_default();
    TicketNote {
        value: record.get("value").cloned(),
        created_on: record.get("sys_created_on").cloned(),
        created_by: record.get("sys_created_by").cloned(),
        note_type: NoteType::from_element(&element),
    }
}

impl OperationExecutor {
    pub(super) async fn get_ticket(&self, args: GetTicketArgs) -> GatewayResult<OperationOutcome> {
        let kind = self.kind(args.ticket_type.as_deref());
        let selector = GetSelector {
            id: args.id,
            number: args.number,
            custom_fields: args.custom_fields,
        };
        let payload = self.gateway.get(kind.table_name(), &selector).await?;

        let Some(ticket) = payload.first() else {
            return Ok(OperationOutcome::Empty("Ticket was not found.".to_string()));
        };

        let attachments = match ticket.get("sys_id").map(value_to_string) {
            Some(sys_id) if args.get_attachments => self.gateway.download_attachments(&sys_id).await?,
            _ => Vec::new(),
        };

        Ok(OperationOutcome::Ticket(self.ticket_view(&kind, &ticket, attachments)))
    }

    pub(super) async fn create_ticket(
        &self,
        args: CreateTicketArgs,
    ) -> GatewayResult<OperationOutcome> {
        let kind = self.kind(args.ticket_type.as_deref());
        let custom = parse_custom_fields(given(&args.custom_fields).unwrap_or_default())?;
        let template = match given(&args.template) {
            Some(name) => Some(self.gateway.template(name).await?),
            None => None,
        };

        let body = self
            .mapper
            .build_body(&kind, &args.fields, template.as_ref(), &custom);
        let created = self.gateway.create(kind.table_name(), &body).await?;
        Ok(OperationOutcome::Ticket(self.ticket_view(&kind, &created, Vec::new())))
    }

    pub(super) async fn update_ticket(
        &self,
        args: UpdateTicketArgs,
    ) -> GatewayResult<OperationOutcome> {
        let kind = self.kind(args.ticket_type.as_deref());
        let custom = parse_custom_fields(given(&args.custom_fields).unwrap_or_default())?;
        let template = match given(&args.template) {
            Some(name) => Some(self.gateway.template(name).await?),
            None => None,
        };

        let body = self
            .mapper
            .build_body(&kind, &args.fields, template.as_ref(), &custom);
        let updated = self.gateway.update(kind.table_name(), &args.id, &body).await?;
        Ok(OperationOutcome::Ticket(self.ticket_view(&kind, &updated, Vec::new())))
    }

    pub(super) async fn delete_ticket(
        &self,
        args: DeleteTicketArgs,
    ) -> GatewayResult<OperationOutcome> {
        let kind = self.kind(args.ticket_type.as_deref());
        self.gateway.delete(kind.table_name(), &args.id).await?;
        Ok(OperationOutcome::Deleted(format!(
            "Ticket with ID {} was successfully deleted.",
            args.id
        )))
    }

    pub(super) async fn add_link(&self, args: AddLinkArgs) -> GatewayResult<OperationOutcome> {
        let text = given(&args.text).unwrap_or(args.link.as_str());
        let markup = link_markup(&args.link, text);
        self.post_journal(args.ticket_type.as_deref(), &args.id, args.post_as_comment, markup)
            .await
    }

    pub(super) async fn add_comment(&self, args: AddCommentArgs) -> GatewayResult<OperationOutcome> {
        self.post_journal(
            args.ticket_type.as_deref(),
            &args.id,
            args.post_as_comment,
            args.comment,
        )
        .await
    }

    async fn post_journal(
        &self,
        ticket_type: Option<&str>,
        id: &str,
        post_as_comment: bool,
        text: String,
    ) -> GatewayResult<OperationOutcome> {
        let kind = self.kind(ticket_type);
        let mut body = Record::new();
        body.insert(journal_key(post_as_comment).to_string(), Value::String(text));
        let updated = self.gateway.update(kind.table_name(), id, &body).await?;
        Ok(OperationOutcome::Ticket(self.ticket_view(&kind, &updated, Vec::new())))
    }

    pub(super) async fn ticket_notes(
        &self,
        args: TicketNotesArgs,
    ) -> GatewayResult<OperationOutcome> {
        let filter = format!("element_id={}^element=comments^ORelement=work_notes", args.id);
        let rows = self
            .gateway
            .query(JOURNAL_TABLE, args.limit, args.offset, Some(&filter))
            .await?;

        if rows.is_empty() {
            return Ok(OperationOutcome::Empty("No results found".to_string()));
        }

        Ok(OperationOutcome::Notes(TicketNotes {
            ticket_id: args.id,
            notes: rows.iter().map(note_from).collect(),
        }))
    }

    pub(super) async fn query_tickets(
        &self,
        args: QueryTicketsArgs,
    ) -> GatewayResult<OperationOutcome> {
        let kind = self.kind(args.ticket_type.as_deref());
        let rows = self
            .gateway
            .query(kind.table_name(), args.limit, args.offset, given(&args.query))
            .await?;

        if rows.is_empty() {
            return Ok(OperationOutcome::Empty("No results found".to_string()));
        }

        let views = rows
            .iter()
            .map(|row| self.ticket_view(&kind, row, Vec::new()))
            .collect();
        Ok(OperationOutcome::Tickets(views))
    }

    pub(super) async fn upload_file(&self, args: UploadFileArgs) -> GatewayResult<OperationOutcome> {
        let kind = self.kind(args.ticket_type.as_deref());
        let file_name = match given(&args.file_name) {
            Some(name) => name.to_string(),
            None => args
                .file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| GatewayError::InvalidArgument("Could not find the file".to_string()))?,
        };

        let uploaded = self
            .gateway
            .upload_attachment(kind.table_name(), &args.id, args.file_path, &file_name)
            .await?;
        let field = |key: &str| uploaded.get(key).map(value_to_string).unwrap_or_default();

        Ok(OperationOutcome::Attachment(UploadedFile {
            ticket_id: args.id.clone(),
            file_name: field("file_name"),
            link: field("download_link"),
            system_id: field("sys_id"),
        }))
    }
}
