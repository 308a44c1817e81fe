//! Infrastructure layer module
//!
//! Adapters that satisfy the domain ports against real systems:
//! - HTTP transport to the remote table API (reqwest)
//! - File-backed checkpoint store
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)

pub mod checkpoint;
pub mod config;
pub mod http;
pub mod logging;

pub use checkpoint::FileCheckpointStore;
pub use http::HttpTransport;
