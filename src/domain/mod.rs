//! Domain layer for the tablegate adapter
//!
//! Pure models (records, resource kinds, enum catalog, checkpoints),
//! the error taxonomy, and the port traits the services depend on.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{GatewayError, GatewayResult};
