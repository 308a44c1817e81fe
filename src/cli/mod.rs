//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

use anyhow::{Context, Result};
use std::sync::Arc;

pub use output::{output, CommandOutput, OutcomeOutput};
pub use types::{Cli, Commands};

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{scrub, LogConfig, LoggerImpl};
use crate::infrastructure::{FileCheckpointStore, HttpTransport};
use crate::services::{OperationExecutor, QueryBuilder, ResourceGateway};

/// Wire the HTTP transport, gateway and checkpoint file for a loaded configuration.
pub fn build_executor(config: &Config) -> Result<OperationExecutor> {
    let transport = HttpTransport::new(&config.instance)
        .context("Failed to create HTTP transport")?;
    let queries = QueryBuilder::new(config.defaults.limit, config.defaults.offset);
    let gateway = ResourceGateway::new(Arc::new(transport), queries);
    let checkpoints = Arc::new(FileCheckpointStore::new(&config.fetch.checkpoint_path));

    Ok(OperationExecutor::from_config(config, gateway, checkpoints))
}

/// Load configuration, initialize logging, run one command and print its outcome.
pub async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let log_config = LogConfig::from_settings(&config.logging)?;
    let _logger = LoggerImpl::init(&log_config).context("Failed to initialize logging")?;

    let operation = cli.command.into_operation()?;
    let executor = build_executor(&config)?;
    let outcome = executor.execute(operation).await?;

    output(&OutcomeOutput::from(outcome), cli.json);
    Ok(())
}

/// Print a failed command and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let message = scrub(&format!("{err:#}"));
    if json_mode {
        let body = serde_json::json!({ "success": false, "error": message });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {message}");
    }
    std::process::exit(1);
}
