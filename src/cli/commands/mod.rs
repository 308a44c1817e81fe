//! CLI command implementations.

pub mod directory;
pub mod record;
pub mod ticket;
