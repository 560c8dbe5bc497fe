use std::sync::Arc;

use indexwatch_core::{RefreshOutcome, Scheduler};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

pub async fn run(scheduler: Arc<Scheduler>, format: OutputFormat) -> Result<(), CliError> {
    match scheduler.refresh_now().await {
        RefreshOutcome::Published(snapshot) => output::render_snapshot(&snapshot, format),
        RefreshOutcome::Coalesced => Err(CliError::Command(String::from(
            "refresh already in progress",
        ))),
    }
}
