//! Fixed, ordered instrument list.
//!
//! Position in the registry is an instrument's identity: every snapshot row
//! `i` belongs to `registry[i]`. There is no mutation API; changing the list
//! means restarting with a new configuration.

use std::sync::Arc;

use crate::adapters::KOSPI_NIGHT_FUTURES_URL;
use crate::{Instrument, SourceKey, SourceKind, ValidationError};

/// Validated, immutable instrument list shared by the scheduler and readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentRegistry {
    instruments: Arc<[Instrument]>,
}

impl InstrumentRegistry {
    pub fn new(instruments: Vec<Instrument>) -> Result<Self, ValidationError> {
        if instruments.is_empty() {
            return Err(ValidationError::EmptyRegistry);
        }

        for (position, instrument) in instruments.iter().enumerate() {
            if instrument.display_name.trim().is_empty() {
                return Err(ValidationError::EmptyDisplayName { position });
            }
            if instrument.source_kind == SourceKind::ScrapedPage
                && !instrument.source_key.is_http_url()
            {
                return Err(ValidationError::InvalidPageUrl {
                    value: instrument.source_key.to_string(),
                });
            }
        }

        Ok(Self {
            instruments: instruments.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Instrument> {
        self.instruments.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn as_slice(&self) -> &[Instrument] {
        &self.instruments
    }
}

impl Default for InstrumentRegistry {
    fn default() -> Self {
        Self {
            instruments: default_instruments().into(),
        }
    }
}

/// US index futures, Korean cash indices, the semiconductor index and the
/// KOSPI 200 night session.
pub fn default_instruments() -> Vec<Instrument> {
    let quote_api = |name: &str, ticker: &'static str| Instrument {
        display_name: name.to_owned(),
        source_kind: SourceKind::QuoteApi,
        source_key: SourceKey::from_static(ticker),
    };

    vec![
        quote_api("Nasdaq 100 Futures", "NQ=F"),
        quote_api("S&P 500 Futures", "ES=F"),
        quote_api("Dow Futures", "YM=F"),
        quote_api("KOSPI", "^KS11"),
        quote_api("KOSDAQ", "^KQ11"),
        quote_api("PHLX Semiconductor", "^SOX"),
        Instrument {
            display_name: String::from("KOSPI 200 Night Futures"),
            source_kind: SourceKind::ScrapedPage,
            source_key: SourceKey::from_static(KOSPI_NIGHT_FUTURES_URL),
        },
    ]
}
