use std::sync::Arc;

use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::adapters::yahoo::failure_from_transport;
use crate::http_client::{HttpClient, HttpRequest, BROWSER_USER_AGENT, DEFAULT_TIMEOUT_MS};
use crate::source::{QuoteFuture, QuoteSource};
use crate::{FetchFailure, Quote, SourceKey, SourceKind};

/// Night-futures page probed with a plain GET.
pub const KOSPI_NIGHT_FUTURES_URL: &str = "http://esignal.co.kr/kospi200-futures-night/";

/// Connectivity-only adapter for pages that render their values client-side.
///
/// A 2xx response yields [`Quote::Connected`]: the page is reachable but the
/// live value arrives over a script-driven feed that a server-side fetch
/// cannot run. Getting a real number needs a streaming source instead.
#[derive(Clone)]
pub struct ScrapedPageAdapter {
    http_client: Arc<dyn HttpClient>,
    user_agent: String,
    timeout_ms: u64,
}

impl ScrapedPageAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            user_agent: BROWSER_USER_AGENT.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn check_page(&self, key: &SourceKey) -> Result<Option<String>, FetchFailure> {
        let request = HttpRequest::get(key.as_str())
            .with_user_agent(self.user_agent.as_str())
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| failure_from_transport(&error))?;

        if !response.is_success() {
            return Err(FetchFailure::http_status(response.status));
        }

        Ok(page_title(&response.body))
    }
}

impl QuoteSource for ScrapedPageAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::ScrapedPage
    }

    fn fetch_quote<'a>(&'a self, key: &'a SourceKey) -> QuoteFuture<'a> {
        Box::pin(async move {
            match self.check_page(key).await {
                Ok(title) => {
                    debug!(url = %key, title = title.as_deref().unwrap_or(""), "page reachable");
                    Quote::Connected
                }
                Err(failure) => {
                    warn!(
                        url = %key,
                        kind = failure.kind().as_str(),
                        error = failure.message(),
                        "page check failed"
                    );
                    Quote::fetch_error(failure)
                }
            }
        })
    }
}

fn page_title(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let selector = Selector::parse("title").ok()?;
    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>();
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_owned())
}
