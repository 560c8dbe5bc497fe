//! # indexwatch Core
//!
//! Polling aggregation core for the indexwatch market monitor.
//!
//! ## Overview
//!
//! The core repeatedly fetches a fixed list of indices and futures from
//! heterogeneous, unreliable sources, normalizes every response into a
//! [`Quote`], and publishes one ordered, immutable [`Snapshot`] per refresh
//! cycle. Presentation layers read or subscribe to snapshots; they never talk
//! to providers.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Quote-API (Yahoo chart) and scraped-page adapters |
//! | [`circuit_breaker`] | Per-adapter circuit breaker |
//! | [`config`] | TOML configuration with defaults |
//! | [`domain`] | Instruments, quotes, snapshots, display formatting |
//! | [`error`] | Validation and configuration errors |
//! | [`http_client`] | HTTP transport abstraction over reqwest |
//! | [`registry`] | Ordered, immutable instrument list |
//! | [`scheduler`] | Timer/manual refresh driver with coalescing |
//! | [`source`] | Adapter trait and per-kind adapter set |
//! | [`store`] | Latest-snapshot store with subscriptions |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐  tick / trigger  ┌──────────────────┐
//! │  Presentation   │─────────────────▶│    Scheduler     │
//! └────────▲────────┘                  └────────┬─────────┘
//!          │ read / subscribe                   │ one task per instrument
//!          │                                    ▼
//! ┌────────┴────────┐   publish     ┌──────────────────────┐
//! │  SnapshotStore  │◀──────────────│ QuoteSource adapters │
//! └─────────────────┘               │ (chart API, page)    │
//!                                   └──────────┬───────────┘
//!                                              ▼
//!                                   ┌──────────────────────┐
//!                                   │ HttpClient (reqwest) │
//!                                   └──────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Adapters never return errors. Upstream trouble becomes a
//! [`Quote::FetchError`] carrying a [`FailureKind`]; empty responses become
//! [`Quote::NoData`]. A cycle therefore always publishes a row for every
//! instrument:
//!
//! ```rust
//! use indexwatch_core::{Quote, QuoteDisplay, QuoteStatus};
//!
//! let display = QuoteDisplay::of(&Quote::NoData);
//! assert_eq!(display.price, "N/A");
//! assert_eq!(Quote::NoData.status(), QuoteStatus::NoData);
//! ```

pub mod adapters;
pub mod circuit_breaker;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod registry;
pub mod scheduler;
pub mod source;
pub mod store;

pub use adapters::{ScrapedPageAdapter, YahooChartAdapter};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use config::AppConfig;
pub use domain::{
    format_change_percent, format_price, Direction, FailureKind, FetchFailure, Instrument, Quote,
    QuoteDisplay, QuoteStatus, Snapshot, SnapshotRow, SourceKey, SourceKind, UtcDateTime,
};
pub use error::{ConfigError, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use registry::InstrumentRegistry;
pub use scheduler::{RefreshOutcome, Scheduler, SchedulerConfig, SchedulerState};
pub use source::{QuoteFuture, QuoteSource, SourceSet};
pub use store::{SnapshotReceiver, SnapshotStore};
