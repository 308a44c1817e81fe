use serde::{Deserialize, Serialize};

/// Main configuration structure for tablegate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Remote instance connection settings
    #[serde(default)]
    pub instance: InstanceConfig,

    /// Defaults applied to command arguments the caller leaves out
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Incremental fetch (poll) settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Skip enum translation in normalized ticket views
    #[serde(default)]
    pub legacy_field_format: bool,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instance: InstanceConfig::default(),
            defaults: DefaultsConfig::default(),
            fetch: FetchConfig::default(),
            legacy_field_format: false,
            logging: LoggingConfig::default(),
        }
    }
}

/// Remote instance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InstanceConfig {
    /// Server URL, e.g. `https://example.service-now.com`
    #[serde(default)]
    pub url: String,

    /// REST API version segment (`/api/now/<version>/`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Basic-auth user
    #[serde(default)]
    pub username: String,

    /// Basic-auth password
    #[serde(default)]
    pub password: String,

    /// Accept invalid TLS certificates
    #[serde(default)]
    pub insecure: bool,

    /// Proxy URL for all requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_version: None,
            username: String::new(),
            password: String::new(),
            insecure: false,
            proxy: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl InstanceConfig {
    /// Base URL of the table API, always ending in `/`.
    pub fn api_base_url(&self) -> String {
        let server = self.url.trim_end_matches('/');
        match self.api_version.as_deref().filter(|v| !v.is_empty()) {
            Some(version) => format!("{server}/api/now/{version}/"),
            None => format!("{server}/api/now/"),
        }
    }
}

/// Argument defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DefaultsConfig {
    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default)]
    pub offset: u32,

    /// Ticket table used when a ticket command names none
    #[serde(default = "default_ticket_type")]
    pub ticket_type: String,
}

const fn default_limit() -> u32 {
    10
}

fn default_ticket_type() -> String {
    "incident".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            ticket_type: default_ticket_type(),
        }
    }
}

/// Incremental fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FetchConfig {
    /// Whether this configuration polls for incidents
    #[serde(default)]
    pub enabled: bool,

    /// Watched table
    #[serde(default = "default_ticket_type")]
    pub ticket_type: String,

    /// Lookback window for the first run, e.g. "10 minutes"
    #[serde(default = "default_fetch_time")]
    pub fetch_time: String,

    /// Static filter ANDed in front of the checkpoint window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sysparm_query: Option<String>,

    /// Page size and per-cycle item cap
    #[serde(default = "default_limit")]
    pub fetch_limit: u32,

    /// Column compared against the checkpoint
    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,

    /// Download attachments for every emitted record
    #[serde(default)]
    pub get_attachments: bool,

    /// Where the file checkpoint store keeps its slot
    #[serde(default = "default_checkpoint_path")]
    pub checkpoint_path: String,
}

fn default_fetch_time() -> String {
    "10 minutes".to_string()
}

fn default_timestamp_field() -> String {
    "opened_at".to_string()
}

fn default_checkpoint_path() -> String {
    ".tablegate/last_run.json".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ticket_type: default_ticket_type(),
            fetch_time: default_fetch_time(),
            sysparm_query: None,
            fetch_limit: default_limit(),
            timestamp_field: default_timestamp_field(),
            get_attachments: false,
            checkpoint_path: default_checkpoint_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Rotation policy: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_url() {
        let mut instance = InstanceConfig {
            url: "https://dev.example.com//".to_string(),
            ..Default::default()
        };
        assert_eq!(instance.api_base_url(), "https://dev.example.com/api/now/");

        instance.api_version = Some("v2".to_string());
        assert_eq!(instance.api_base_url(), "https://dev.example.com/api/now/v2/");
    }

    #[test]
    fn test_fetch_defaults() {
        let fetch = FetchConfig::default();
        assert_eq!(fetch.fetch_time, "10 minutes");
        assert_eq!(fetch.fetch_limit, 10);
        assert_eq!(fetch.timestamp_field, "opened_at");
        assert_eq!(fetch.ticket_type, "incident");
        assert!(!fetch.get_attachments);
    }
}
