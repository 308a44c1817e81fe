//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that infrastructure adapters must implement:
//! - Transport: request execution against the remote table API
//! - CheckpointStore: host-owned persistence of the poll checkpoint
//!
//! These traits keep the gateway and the poller independent of HTTP
//! clients and storage backends.

pub mod checkpoint_store;
pub mod transport;

pub use checkpoint_store::{CheckpointStore, InMemoryCheckpointStore};
pub use transport::{FileUpload, HttpMethod, QueryParams, Transport, TransportResponse};
