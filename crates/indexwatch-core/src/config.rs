//! Runtime configuration.
//!
//! Every option has a default, so an empty (or absent) TOML file yields the
//! stock seven-instrument watch list refreshed every 30 seconds.
//!
//! ```toml
//! refresh_interval_ms = 30000
//! per_request_timeout_ms = 5000
//!
//! [[instruments]]
//! display_name = "KOSPI"
//! source_kind = "quote_api"
//! source_key = "^KS11"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::DEFAULT_CHART_BASE_URL;
use crate::error::ConfigError;
use crate::http_client::BROWSER_USER_AGENT;
use crate::registry::{default_instruments, InstrumentRegistry};
use crate::{Instrument, ValidationError};

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 30_000;
pub const DEFAULT_PER_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Upper bound applied to scraped-page requests regardless of the global timeout.
pub const MAX_PAGE_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub refresh_interval_ms: u64,
    pub per_request_timeout_ms: u64,
    /// Base URL of the chart API; overridable for proxies and tests.
    pub chart_base_url: String,
    /// User-Agent sent to scraped pages.
    pub user_agent: String,
    pub instruments: Vec<Instrument>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            per_request_timeout_ms: DEFAULT_PER_REQUEST_TIMEOUT_MS,
            chart_base_url: DEFAULT_CHART_BASE_URL.to_owned(),
            user_agent: BROWSER_USER_AGENT.to_owned(),
            instruments: default_instruments(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!(
            path = %path.display(),
            instruments = config.instruments.len(),
            refresh_interval_ms = config.refresh_interval_ms,
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.refresh_interval_ms == 0 {
            return Err(ValidationError::NonPositiveDuration {
                field: "refresh_interval_ms",
            });
        }
        if self.per_request_timeout_ms == 0 {
            return Err(ValidationError::NonPositiveDuration {
                field: "per_request_timeout_ms",
            });
        }
        self.registry().map(|_| ())
    }

    pub fn registry(&self) -> Result<InstrumentRegistry, ValidationError> {
        InstrumentRegistry::new(self.instruments.clone())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn per_request_timeout(&self) -> Duration {
        Duration::from_millis(self.per_request_timeout_ms)
    }

    pub fn page_timeout_ms(&self) -> u64 {
        self.per_request_timeout_ms.min(MAX_PAGE_TIMEOUT_MS)
    }
}
