pub mod checkpoint;
pub mod config;
pub mod enum_catalog;
pub mod event;
pub mod lookback;
pub mod record;
pub mod resource_kind;
pub mod ticket;

pub use checkpoint::{parse_timestamp, Checkpoint, TIMESTAMP_FORMAT};
pub use config::{Config, DefaultsConfig, FetchConfig, InstanceConfig, LoggingConfig};
pub use enum_catalog::{EnumCatalog, EnumField};
pub use event::{event_severity, AttachmentFile, EventLabel, PollBatch, PollEvent};
pub use lookback::{LookbackUnit, LookbackWindow};
pub use record::{Record, Reference, AUDIT_FIELDS};
pub use resource_kind::ResourceKind;
pub use ticket::{HumanReadableTicket, NormalizedTicket, NoteType, TicketNote, RECOGNIZED_ARGS};
