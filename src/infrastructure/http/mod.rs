//! HTTP transport for the remote table API
pub mod client;

pub use client::HttpTransport;
