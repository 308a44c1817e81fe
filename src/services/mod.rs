pub mod field_mapper;
pub mod gateway;
pub mod operations;
pub mod poller;
pub mod probe;
pub mod query_builder;

pub use field_mapper::FieldMapper;
pub use gateway::{classify_response, GetSelector, RemotePayload, ResourceGateway};
pub use operations::{Operation, OperationExecutor, OperationOutcome};
pub use poller::{IncrementalPoller, PollSettings};
pub use probe::ConnectivityProbe;
pub use query_builder::QueryBuilder;
