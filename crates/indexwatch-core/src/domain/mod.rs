//! # Domain Models
//!
//! Canonical types shared by adapters, the scheduler and presentation layers.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Instrument`] | Display name bound to a source kind and key |
//! | [`SourceKey`] | Validated ticker or page URL |
//! | [`Quote`] | Normalized adapter outcome (priced, placeholder, no data, error) |
//! | [`Snapshot`] | Ordered rows of one refresh cycle |
//! | [`QuoteDisplay`] | Formatted price/change text for a row |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Prices and percentages are [`rust_decimal::Decimal`]; only
//! [`QuoteDisplay`] turns them into text.

mod format;
mod instrument;
mod quote;
mod snapshot;
mod source_key;
mod timestamp;

pub use format::{
    format_change_percent, format_price, QuoteDisplay, CONNECTED_TEXT, ERROR_TEXT, NO_DATA_TEXT,
    PENDING_TEXT,
};
pub use instrument::{Instrument, SourceKind};
pub use quote::{Direction, FailureKind, FetchFailure, Quote, QuoteStatus};
pub use snapshot::{Snapshot, SnapshotRow};
pub use source_key::SourceKey;
pub use timestamp::UtcDateTime;
