use std::path::PathBuf;

use thiserror::Error;

/// Validation and contract errors exposed by `indexwatch-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("source key cannot be empty")]
    EmptySourceKey,
    #[error("source key length {len} exceeds max {max}")]
    SourceKeyTooLong { len: usize, max: usize },
    #[error("source key contains whitespace at index {index}")]
    SourceKeyWhitespace { index: usize },

    #[error("invalid source kind '{value}', expected one of quote_api, scraped_page")]
    InvalidSourceKind { value: String },

    #[error("scraped page key must be an http(s) URL: '{value}'")]
    InvalidPageUrl { value: String },

    #[error("display name cannot be empty (instrument #{position})")]
    EmptyDisplayName { position: usize },

    #[error("instrument registry must contain at least one instrument")]
    EmptyRegistry,

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be greater than zero")]
    NonPositiveDuration { field: &'static str },
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
