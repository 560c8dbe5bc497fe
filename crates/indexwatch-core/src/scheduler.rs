//! Refresh cycle driver.
//!
//! A [`Scheduler`] owns the registry, one adapter per source kind and a
//! handle to the [`SnapshotStore`]. Each cycle fans out one task per
//! instrument, joins them in registry order and publishes a complete
//! snapshot. At most one cycle is in flight: a trigger that arrives while
//! refreshing is dropped and reported as [`RefreshOutcome::Coalesced`].
//!
//! ```rust,ignore
//! let scheduler = Arc::new(Scheduler::from_config(&config, http_client)?);
//! tokio::spawn(Arc::clone(&scheduler).run(shutdown));
//! scheduler.trigger(); // "refresh now"
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, info_span, Instrument as _};

use crate::adapters::{ScrapedPageAdapter, YahooChartAdapter};
use crate::config::AppConfig;
use crate::http_client::HttpClient;
use crate::registry::InstrumentRegistry;
use crate::source::SourceSet;
use crate::store::SnapshotStore;
use crate::{FetchFailure, Quote, QuoteStatus, Snapshot, SnapshotRow, UtcDateTime, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub refresh_interval: Duration,
    /// Deadline for each adapter call; a late adapter yields `FETCH_ERROR`.
    pub per_request_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SchedulerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            per_request_timeout: config.per_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Refreshing,
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The cycle ran and this snapshot is now current.
    Published(Arc<Snapshot>),
    /// Another cycle was already in flight; nothing was queued.
    Coalesced,
}

impl RefreshOutcome {
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            Self::Published(snapshot) => Some(snapshot),
            Self::Coalesced => None,
        }
    }

    pub const fn is_coalesced(&self) -> bool {
        matches!(self, Self::Coalesced)
    }
}

/// Releases the in-flight flag when the cycle ends, including on unwind.
struct RefreshGuard<'a>(&'a AtomicBool);

impl<'a> RefreshGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Scheduler {
    registry: InstrumentRegistry,
    sources: SourceSet,
    store: Arc<SnapshotStore>,
    config: SchedulerConfig,
    refreshing: AtomicBool,
    cycles: AtomicU64,
}

impl Scheduler {
    pub fn new(
        registry: InstrumentRegistry,
        sources: SourceSet,
        store: Arc<SnapshotStore>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            registry,
            sources,
            store,
            config,
            refreshing: AtomicBool::new(false),
            cycles: AtomicU64::new(0),
        }
    }

    /// Wires the production adapters from configuration.
    pub fn from_config(
        config: &AppConfig,
        http_client: Arc<dyn HttpClient>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;

        let quote_api = YahooChartAdapter::new(Arc::clone(&http_client))
            .with_base_url(config.chart_base_url.as_str())
            .with_timeout_ms(config.per_request_timeout_ms);
        let scraped_page = ScrapedPageAdapter::new(http_client)
            .with_user_agent(config.user_agent.as_str())
            .with_timeout_ms(config.page_timeout_ms());

        Ok(Self::new(
            config.registry()?,
            SourceSet::new(Arc::new(quote_api), Arc::new(scraped_page)),
            Arc::new(SnapshotStore::new()),
            SchedulerConfig::from(config),
        ))
    }

    pub fn registry(&self) -> &InstrumentRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    pub const fn config(&self) -> SchedulerConfig {
        self.config
    }

    pub fn state(&self) -> SchedulerState {
        if self.refreshing.load(Ordering::Acquire) {
            SchedulerState::Refreshing
        } else {
            SchedulerState::Idle
        }
    }

    /// Latest published snapshot; `None` until the first cycle completes.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.store.read()
    }

    /// Runs one cycle now unless one is already in flight.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        let Some(_guard) = RefreshGuard::acquire(&self.refreshing) else {
            debug!("refresh already in flight; trigger dropped");
            return RefreshOutcome::Coalesced;
        };

        let snapshot = self.run_cycle().await;
        RefreshOutcome::Published(self.store.replace(snapshot))
    }

    /// Fire-and-forget manual trigger for presentation layers.
    pub fn trigger(self: &Arc<Self>) -> JoinHandle<RefreshOutcome> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move { scheduler.refresh_now().await })
    }

    /// Refreshes immediately, then every `refresh_interval`, until `shutdown`
    /// resolves. A cycle that has started is always allowed to publish.
    pub async fn run<F>(self: Arc<Self>, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        let mut ticker = tokio::time::interval(self.config.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            instruments = self.registry.len(),
            refresh_interval_ms = self.config.refresh_interval.as_millis() as u64,
            "scheduler started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.refresh_now().await;
                }
            }
        }

        info!("scheduler stopped");
    }

    async fn run_cycle(&self) -> Snapshot {
        let started = Instant::now();
        let quotes = self.collect_quotes().await;

        let rows = self
            .registry
            .iter()
            .cloned()
            .zip(quotes)
            .map(|(instrument, quote)| SnapshotRow { instrument, quote })
            .collect::<Vec<_>>();

        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Snapshot::new(cycle, UtcDateTime::now(), rows);

        info!(
            cycle,
            ok = snapshot.count_status(QuoteStatus::Ok),
            no_data = snapshot.count_status(QuoteStatus::NoData),
            fetch_errors = snapshot.count_status(QuoteStatus::FetchError),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "refresh cycle complete"
        );
        snapshot
    }

    /// One task per instrument; results come back in registry order.
    async fn collect_quotes(&self) -> Vec<Quote> {
        let timeout = self.config.per_request_timeout;

        let handles = self
            .registry
            .iter()
            .map(|instrument| {
                let source = self.sources.for_kind(instrument.source_kind);
                let key = instrument.source_key.clone();
                let span = info_span!(
                    "fetch",
                    source = source.kind().as_str(),
                    key = %key
                );

                tokio::spawn(
                    async move {
                        match tokio::time::timeout(timeout, source.fetch_quote(&key)).await {
                            Ok(quote) => quote,
                            Err(_) => {
                                debug!("adapter deadline elapsed");
                                Quote::fetch_error(FetchFailure::timeout(format!(
                                    "no response within {} ms",
                                    timeout.as_millis()
                                )))
                            }
                        }
                    }
                    .instrument(span),
                )
            })
            .collect::<Vec<_>>();

        join_all(handles)
            .await
            .into_iter()
            .zip(self.registry.iter())
            .map(|(joined, instrument)| {
                joined.unwrap_or_else(|join_error| {
                    error!(
                        instrument = instrument.display_name.as_str(),
                        error = %join_error,
                        "adapter task failed"
                    );
                    Quote::fetch_error(FetchFailure::internal(format!(
                        "adapter task failed: {join_error}"
                    )))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{QuoteFuture, QuoteSource};
    use crate::{Instrument, SourceKey, SourceKind};

    struct PanickingSource;

    impl QuoteSource for PanickingSource {
        fn kind(&self) -> SourceKind {
            SourceKind::ScrapedPage
        }

        fn fetch_quote<'a>(&'a self, _key: &'a SourceKey) -> QuoteFuture<'a> {
            Box::pin(async move { explode() })
        }
    }

    fn explode() -> Quote {
        panic!("adapter bug")
    }

    struct ConnectedSource;

    impl QuoteSource for ConnectedSource {
        fn kind(&self) -> SourceKind {
            SourceKind::QuoteApi
        }

        fn fetch_quote<'a>(&'a self, _key: &'a SourceKey) -> QuoteFuture<'a> {
            Box::pin(async move { Quote::Connected })
        }
    }

    fn scheduler() -> Scheduler {
        let registry = InstrumentRegistry::new(vec![
            Instrument::quote_api("KOSPI", "^KS11").expect("valid"),
            Instrument::scraped_page("Night", "http://night.test/").expect("valid"),
        ])
        .expect("valid registry");

        Scheduler::new(
            registry,
            SourceSet::new(Arc::new(ConnectedSource), Arc::new(PanickingSource)),
            Arc::new(SnapshotStore::new()),
            SchedulerConfig::default(),
        )
    }

    #[tokio::test]
    async fn panicking_adapter_only_fails_its_own_row() {
        let scheduler = scheduler();

        let outcome = scheduler.refresh_now().await;
        let snapshot = outcome.snapshot().expect("cycle publishes");

        assert_eq!(snapshot.rows()[0].quote, Quote::Connected);
        assert_eq!(
            snapshot.rows()[1].quote.failure().map(FetchFailure::kind),
            Some(crate::FailureKind::Internal)
        );
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test]
    async fn cycle_numbers_increase_per_publish() {
        let scheduler = scheduler();

        scheduler.refresh_now().await;
        scheduler.refresh_now().await;

        assert_eq!(scheduler.snapshot().map(|s| s.cycle()), Some(2));
        assert_eq!(scheduler.store().published_count(), 2);
    }

    #[test]
    fn guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let guard = RefreshGuard::acquire(&flag).expect("first acquire");
        assert!(RefreshGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(RefreshGuard::acquire(&flag).is_some());
    }
}
