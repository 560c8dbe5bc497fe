use indexwatch_core::AppConfig;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

pub fn run(config: &AppConfig, format: OutputFormat) -> Result<(), CliError> {
    let registry = config.registry()?;
    output::render_registry(&registry, format)
}
