//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - Defaults, then `.tablegate/config.yaml`, then `.tablegate/local.yaml`
//! - `TABLEGATE_*` environment overrides (`__` separates nested keys)
//! - Validation of instance, fetch and logging settings

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
