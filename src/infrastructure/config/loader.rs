use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::LookbackWindow;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Instance URL cannot be empty")]
    EmptyInstanceUrl,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid fetch_limit: {0}. Must be at least 1")]
    InvalidFetchLimit(u32),

    #[error("Fetch timestamp_field cannot be empty")]
    EmptyTimestampField,

    #[error("Invalid fetch_time: {0}")]
    InvalidFetchTime(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

const ENV_PREFIX: &str = "TABLEGATE_";

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .tablegate/config.yaml (project config)
    /// 3. .tablegate/local.yaml (local overrides, optional)
    /// 4. Environment variables (TABLEGATE_* prefix, `__` between nested keys)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".tablegate/config.yaml"))
            .merge(Yaml::file(".tablegate/local.yaml"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file; environment variables still override it.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.instance.url.trim().is_empty() {
            return Err(ConfigError::EmptyInstanceUrl);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        if config.fetch.fetch_limit == 0 {
            return Err(ConfigError::InvalidFetchLimit(config.fetch.fetch_limit));
        }

        if config.fetch.timestamp_field.trim().is_empty() {
            return Err(ConfigError::EmptyTimestampField);
        }

        LookbackWindow::parse(&config.fetch.fetch_time)
            .map_err(|e| ConfigError::InvalidFetchTime(e.to_string()))?;

        if let Some(proxy) = &config.instance.proxy {
            if proxy.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "instance.proxy cannot be an empty string".to_string(),
                ));
            }
        }

        Ok(())
    }
}
