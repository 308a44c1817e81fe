//! User, group and computer lookups.

use clap::{Args, Subcommand};

use crate::services::operations::{DirectoryArgs as Lookup, Operation};

#[derive(Args, Debug)]
pub struct DirectoryArgs {
    #[command(subcommand)]
    pub command: DirectoryCommands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LookupFilter {
    /// System ID
    #[arg(long)]
    pub id: Option<String>,
    /// Raw filter expression
    #[arg(short, long)]
    pub query: Option<String>,
    #[arg(short, long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub offset: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum DirectoryCommands {
    /// Query users
    Users {
        /// User name
        #[arg(long)]
        user_name: Option<String>,
        #[command(flatten)]
        filter: LookupFilter,
    },
    /// Query groups
    Groups {
        /// Group name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        filter: LookupFilter,
    },
    /// Query computers
    Computers {
        /// Computer name
        #[arg(long)]
        name: Option<String>,
        /// Asset tag
        #[arg(long)]
        asset_tag: Option<String>,
        #[command(flatten)]
        filter: LookupFilter,
    },
}

fn lookup(filter: LookupFilter, name: Option<String>, asset_tag: Option<String>) -> Lookup {
    Lookup {
        id: filter.id,
        name,
        asset_tag,
        query: filter.query,
        limit: filter.limit,
        offset: filter.offset,
    }
}

impl From<DirectoryArgs> for Operation {
    fn from(args: DirectoryArgs) -> Self {
        match args.command {
            DirectoryCommands::Users { user_name, filter } => {
                Operation::QueryUsers(lookup(filter, user_name, None))
            }
            DirectoryCommands::Groups { name, filter } => {
                Operation::QueryGroups(lookup(filter, name, None))
            }
            DirectoryCommands::Computers {
                name,
                asset_tag,
                filter,
            } => Operation::QueryComputers(lookup(filter, name, asset_tag)),
        }
    }
}
