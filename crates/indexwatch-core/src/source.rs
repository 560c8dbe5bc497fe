//! Adapter contract shared by every data-provider shape.
//!
//! A [`QuoteSource`] turns one provider key into a [`Quote`]. The call is
//! infallible by signature: transport, status and parse failures come back
//! as [`Quote::FetchError`] with a recorded [`FailureKind`](crate::FailureKind),
//! so the scheduler folds every outcome into the snapshot as data.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::{Quote, SourceKey, SourceKind};

pub type QuoteFuture<'a> = Pin<Box<dyn Future<Output = Quote> + Send + 'a>>;

/// Source adapter contract.
///
/// Implementations must be `Send + Sync`; the scheduler shares one instance
/// per kind across all concurrent fetches of a cycle.
pub trait QuoteSource: Send + Sync {
    /// Response shape this adapter understands.
    fn kind(&self) -> SourceKind;

    /// Fetches and normalizes the latest quote for `key`. Never panics on
    /// upstream misbehavior and never returns an error.
    fn fetch_quote<'a>(&'a self, key: &'a SourceKey) -> QuoteFuture<'a>;
}

/// One adapter per [`SourceKind`], resolved for each registry entry.
#[derive(Clone)]
pub struct SourceSet {
    quote_api: Arc<dyn QuoteSource>,
    scraped_page: Arc<dyn QuoteSource>,
}

impl SourceSet {
    pub fn new(quote_api: Arc<dyn QuoteSource>, scraped_page: Arc<dyn QuoteSource>) -> Self {
        Self {
            quote_api,
            scraped_page,
        }
    }

    pub fn for_kind(&self, kind: SourceKind) -> Arc<dyn QuoteSource> {
        match kind {
            SourceKind::QuoteApi => Arc::clone(&self.quote_api),
            SourceKind::ScrapedPage => Arc::clone(&self.scraped_page),
        }
    }
}
