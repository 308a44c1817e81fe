//! Ticket CLI commands.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::services::field_mapper::TicketArgs as TicketFields;
use crate::services::operations::{
    AddCommentArgs, AddLinkArgs, CreateTicketArgs, DeleteTicketArgs, GetTicketArgs, Operation,
    QueryTicketsArgs, TicketNotesArgs, UpdateTicketArgs, UploadFileArgs,
};

#[derive(Args, Debug)]
pub struct TicketArgs {
    #[command(subcommand)]
    pub command: TicketCommands,
}

#[derive(Subcommand, Debug)]
pub enum TicketCommands {
    /// Retrieve a ticket by system ID or number
    Get {
        /// Ticket system ID
        #[arg(long)]
        id: Option<String>,
        /// Ticket number, e.g. INC0010001
        #[arg(long)]
        number: Option<String>,
        /// Ticket table (incident, problem, change_request, ...)
        #[arg(short = 't', long)]
        ticket_type: Option<String>,
        /// Equality filter, format: "key=value,key=value"
        #[arg(long)]
        custom_fields: Option<String>,
        /// Download the ticket's attachments
        #[arg(long)]
        get_attachments: bool,
    },
    /// Create a ticket
    Create {
        #[arg(short = 't', long)]
        ticket_type: Option<String>,
        /// Ticket field, format: "name=value" (repeatable)
        #[arg(short, long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
        /// Template whose values fill fields left unset
        #[arg(long)]
        template: Option<String>,
        /// Custom fields, format: "key=value;key=value"
        #[arg(long)]
        custom_fields: Option<String>,
    },
    /// Update a ticket
    Update {
        /// Ticket system ID
        id: String,
        #[arg(short = 't', long)]
        ticket_type: Option<String>,
        #[arg(short, long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        custom_fields: Option<String>,
    },
    /// Delete a ticket
    Delete {
        id: String,
        #[arg(short = 't', long)]
        ticket_type: Option<String>,
    },
    /// Add a link to a ticket's work notes or comments
    AddLink {
        id: String,
        link: String,
        /// Anchor text
        #[arg(long)]
        text: Option<String>,
        #[arg(short = 't', long)]
        ticket_type: Option<String>,
        /// Post as a comment instead of a work note
        #[arg(long)]
        post_as_comment: bool,
    },
    /// Add a comment or work note to a ticket
    AddComment {
        id: String,
        comment: String,
        #[arg(short = 't', long)]
        ticket_type: Option<String>,
        #[arg(long)]
        post_as_comment: bool,
    },
    /// List a ticket's comments and work notes
    Notes {
        id: String,
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Query tickets with a filter expression
    Query {
        #[arg(short = 't', long)]
        ticket_type: Option<String>,
        /// Filter, e.g. "active=true^priority=1"
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Upload a file as a ticket attachment
    Upload {
        id: String,
        file: PathBuf,
        /// Name reported to the server
        #[arg(long)]
        file_name: Option<String>,
        #[arg(short = 't', long)]
        ticket_type: Option<String>,
    },
}

impl TicketArgs {
    pub fn into_operation(self) -> Result<Operation> {
        let operation = match self.command {
            TicketCommands::Get {
                id,
                number,
                ticket_type,
                custom_fields,
                get_attachments,
            } => Operation::GetTicket(GetTicketArgs {
                ticket_type,
                id,
                number,
                custom_fields,
                get_attachments,
            }),
            TicketCommands::Create {
                ticket_type,
                fields,
                template,
                custom_fields,
            } => Operation::CreateTicket(CreateTicketArgs {
                ticket_type,
                fields: parse_field_flags(&fields)?,
                template,
                custom_fields,
            }),
            TicketCommands::Update {
                id,
                ticket_type,
                fields,
                template,
                custom_fields,
            } => Operation::UpdateTicket(UpdateTicketArgs {
                ticket_type,
                id,
                fields: parse_field_flags(&fields)?,
                template,
                custom_fields,
            }),
            TicketCommands::Delete { id, ticket_type } => {
                Operation::DeleteTicket(DeleteTicketArgs { ticket_type, id })
            }
            TicketCommands::AddLink {
                id,
                link,
                text,
                ticket_type,
                post_as_comment,
            } => Operation::AddLink(AddLinkArgs {
                ticket_type,
                id,
                link,
                text,
                post_as_comment,
            }),
            TicketCommands::AddComment {
                id,
                comment,
                ticket_type,
                post_as_comment,
            } => Operation::AddComment(AddCommentArgs {
                ticket_type,
                id,
                comment,
                post_as_comment,
            }),
            TicketCommands::Notes { id, limit, offset } => {
                Operation::GetTicketNotes(TicketNotesArgs { id, limit, offset })
            }
            TicketCommands::Query {
                ticket_type,
                query,
                limit,
                offset,
            } => Operation::QueryTickets(QueryTicketsArgs {
                ticket_type,
                limit,
                offset,
                query,
            }),
            TicketCommands::Upload {
                id,
                file,
                file_name,
                ticket_type,
            } => Operation::UploadFile(UploadFileArgs {
                ticket_type,
                id,
                file_path: file,
                file_name,
            }),
        };
        Ok(operation)
    }
}

/// Parse repeated `name=value` flags; later flags win.
fn parse_field_flags(flags: &[String]) -> Result<TicketFields> {
    let mut fields = TicketFields::new();
    for flag in flags {
        let Some((name, value)) = flag.split_once('=') else {
            bail!("Invalid field '{flag}', expected NAME=VALUE");
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("Invalid field '{flag}', name is empty");
        }
        fields.insert(name.to_string(), value.to_string());
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_flags() {
        let fields = parse_field_flags(&[
            "short_description=disk full".to_string(),
            "urgency=1 - High".to_string(),
            "description=a=b".to_string(),
        ])
        .unwrap();
        assert_eq!(fields["short_description"], "disk full");
        assert_eq!(fields["urgency"], "1 - High");
        assert_eq!(fields["description"], "a=b");

        assert!(parse_field_flags(&["oops".to_string()]).is_err());
        assert!(parse_field_flags(&["=x".to_string()]).is_err());
    }

    #[test]
    fn test_create_maps_to_operation() {
        let args = TicketArgs {
            command: TicketCommands::Create {
                ticket_type: Some("problem".to_string()),
                fields: vec!["impact=2".to_string()],
                template: Some("standard".to_string()),
                custom_fields: None,
            },
        };
        match args.into_operation().unwrap() {
            Operation::CreateTicket(create) => {
                assert_eq!(create.ticket_type.as_deref(), Some("problem"));
                assert_eq!(create.fields["impact"], "2");
                assert_eq!(create.template.as_deref(), Some("standard"));
            }
            other => panic!("unexpected operation: {other:?}"),
        }
    }
}
