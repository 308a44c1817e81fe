//! Domain errors for the tablegate adapter.

use thiserror::Error;

/// Errors that can abort a gateway operation or a poll cycle.
///
/// "No Record found" envelopes and empty result lists are never surfaced
/// through this type; the gateway normalizes them into empty successes.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed caller input (unparseable custom-field token, unusable `get` selector).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A named server-side object (e.g. a template) resolved to zero rows.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Explicit remote error envelope, non-2xx status, unparseable body or failed attachment fetch.
    #[error("Remote error: {0}")]
    RemoteError(String),

    /// Misconfigured watch field or lookback window.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Io(err.to_string())
    }
}
