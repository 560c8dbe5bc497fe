use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{SourceKey, ValidationError};

/// Response shape an instrument is served by; selects the adapter at refresh time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Intraday chart plus quote fields from the quote API.
    QuoteApi,
    /// Fixed web page probed over plain HTTP.
    ScrapedPage,
}

impl SourceKind {
    pub const ALL: [Self; 2] = [Self::QuoteApi, Self::ScrapedPage];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QuoteApi => "quote_api",
            Self::ScrapedPage => "scraped_page",
        }
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quote_api" => Ok(Self::QuoteApi),
            "scraped_page" => Ok(Self::ScrapedPage),
            other => Err(ValidationError::InvalidSourceKind {
                value: other.to_owned(),
            }),
        }
    }
}

/// One tracked index or future.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub display_name: String,
    pub source_kind: SourceKind,
    pub source_key: SourceKey,
}

impl Instrument {
    pub fn new(
        display_name: impl Into<String>,
        source_kind: SourceKind,
        source_key: SourceKey,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            source_kind,
            source_key,
        }
    }

    pub fn quote_api(display_name: impl Into<String>, ticker: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(
            display_name,
            SourceKind::QuoteApi,
            SourceKey::parse(ticker)?,
        ))
    }

    pub fn scraped_page(display_name: impl Into<String>, url: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(
            display_name,
            SourceKind::ScrapedPage,
            SourceKey::parse(url)?,
        ))
    }
}
