//! Test doubles for the domain ports.

pub mod mock;

pub use mock::{MockReply, MockTransport, RecordedRequest};
