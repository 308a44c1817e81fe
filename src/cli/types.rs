//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::directory::DirectoryArgs;
use super::commands::record::RecordArgs;
use super::commands::ticket::TicketArgs;
use crate::services::Operation;

#[derive(Parser)]
#[command(name = "tablegate")]
#[command(about = "tablegate - table API adapter for ticketing instances", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file; `.tablegate/config.yaml` layering when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ticket commands
    Ticket(TicketArgs),

    /// Generic table record commands
    Record(RecordArgs),

    /// User, group and computer lookups
    Directory(DirectoryArgs),

    /// Run one incremental fetch cycle and advance the checkpoint
    Fetch,

    /// Check connectivity and fetch configuration
    Test,
}

impl Commands {
    pub fn into_operation(self) -> Result<Operation> {
        Ok(match self {
            Self::Ticket(args) => args.into_operation()?,
            Self::Record(args) => args.into(),
            Self::Directory(args) => args.into(),
            Self::Fetch => Operation::FetchIncidents,
            Self::Test => Operation::TestModule,
        })
    }
}
