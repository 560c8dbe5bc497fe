mod instruments;
mod once;
mod watch;

use std::sync::Arc;

use indexwatch_core::{AppConfig, ReqwestHttpClient, Scheduler};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli)?;

    match &cli.command {
        Command::Instruments => instruments::run(&config, cli.format),
        Command::Once => once::run(build_scheduler(&config)?, cli.format).await,
        Command::Watch(args) => watch::run(build_scheduler(&config)?, args, cli.format).await,
    }
}

/// Config file (if any), then command-line overrides, then validation.
pub fn load_config(cli: &Cli) -> Result<AppConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(interval_ms) = cli.interval_ms {
        config.refresh_interval_ms = interval_ms;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.per_request_timeout_ms = timeout_ms;
    }
    config.validate()?;

    debug!(
        refresh_interval_ms = config.refresh_interval_ms,
        per_request_timeout_ms = config.per_request_timeout_ms,
        instruments = config.instruments.len(),
        "effective configuration"
    );
    Ok(config)
}

fn build_scheduler(config: &AppConfig) -> Result<Arc<Scheduler>, CliError> {
    let http_client = Arc::new(ReqwestHttpClient::new());
    Ok(Arc::new(Scheduler::from_config(config, http_client)?))
}
