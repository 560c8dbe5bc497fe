//! Fakes shared by the behavior suites.
#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use indexwatch_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, Quote, QuoteFuture, QuoteSource, SourceKey,
    SourceKind,
};
use tokio::sync::Notify;

// =============================================================================
// HTTP transport
// =============================================================================

/// Answers by URL prefix and records every request it receives.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Vec<(String, Result<HttpResponse, HttpError>)>,
    delay: Option<Duration>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url_prefix: &str, response: Result<HttpResponse, HttpError>) -> Self {
        self.routes.push((url_prefix.to_owned(), response));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let answer = self
                .routes
                .iter()
                .find(|(prefix, _)| request.url.starts_with(prefix.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| Ok(HttpResponse::new(404, "not found")));

            self.requests.lock().expect("requests lock").push(request);
            answer
        })
    }
}

pub fn chart_body(price: f64, previous_close: f64) -> String {
    format!(
        r#"{{"chart":{{"result":[{{"meta":{{"regularMarketPrice":{price},"previousClose":{previous_close}}},"indicators":{{"quote":[{{"open":[{previous_close}],"close":[{price}]}}]}}}}],"error":null}}}}"#
    )
}

// =============================================================================
// Quote sources
// =============================================================================

/// Returns a fixed quote per key, optionally after a per-key delay.
pub struct FakeSource {
    kind: SourceKind,
    quotes: HashMap<String, Quote>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            quotes: HashMap::new(),
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn quote(mut self, key: &str, quote: Quote) -> Self {
        self.quotes.insert(key.to_owned(), quote);
        self
    }

    pub fn delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_owned(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QuoteSource for FakeSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn fetch_quote<'a>(&'a self, key: &'a SourceKey) -> QuoteFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(key.as_str()) {
                tokio::time::sleep(*delay).await;
            }
            self.quotes
                .get(key.as_str())
                .cloned()
                .unwrap_or(Quote::NoData)
        })
    }
}

/// Parks every call until released, announcing entry first.
pub struct GatedSource {
    kind: SourceKind,
    entered: Arc<Notify>,
    release: Arc<Notify>,
    calls: AtomicUsize,
}

impl GatedSource {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn entered(&self) -> Arc<Notify> {
        Arc::clone(&self.entered)
    }

    pub fn release(&self) -> Arc<Notify> {
        Arc::clone(&self.release)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QuoteSource for GatedSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn fetch_quote<'a>(&'a self, _key: &'a SourceKey) -> QuoteFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Quote::Connected
        })
    }
}
