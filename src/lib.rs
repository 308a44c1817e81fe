//! tablegate - adapter for a remote ticketing instance's table API
//!
//! tablegate reads and writes tickets and arbitrary table records, translates
//! enumerated fields between numeric codes and display labels, and polls a
//! watched table incrementally behind a persisted checkpoint.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Records, tickets, enum catalog, checkpoints and ports
//! - **Service Layer** (`services`): Query building, field mapping, gateway, poller, probe and operations
//! - **Infrastructure Layer** (`infrastructure`): HTTP transport, checkpoint file, config, logging
//! - **Adapters** (`adapters`): In-process test doubles for the ports
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tablegate::{HttpTransport, Operation, OperationExecutor, QueryBuilder, ResourceGateway};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = tablegate::ConfigLoader::load()?;
//!     let transport = Arc::new(HttpTransport::new(&config.instance)?);
//!     let gateway = ResourceGateway::new(transport, QueryBuilder::default());
//!     let executor = OperationExecutor::from_config(
//!         &config,
//!         gateway,
//!         Arc::new(tablegate::domain::ports::InMemoryCheckpointStore::new()),
//!     );
//!     let outcome = executor.execute(Operation::TestModule).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{GatewayError, GatewayResult};
pub use domain::models::{
    Checkpoint, Config, EnumCatalog, EnumField, FetchConfig, InstanceConfig, LookbackWindow,
    NormalizedTicket, PollBatch, PollEvent, Record, ResourceKind,
};
pub use domain::ports::{CheckpointStore, Transport};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::{FileCheckpointStore, HttpTransport};
pub use services::{
    ConnectivityProbe, FieldMapper, IncrementalPoller, Operation, OperationExecutor,
    OperationOutcome, QueryBuilder, ResourceGateway,
};
