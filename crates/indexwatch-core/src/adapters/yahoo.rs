use std::sync::Arc;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, BROWSER_USER_AGENT, DEFAULT_TIMEOUT_MS,
};
use crate::source::{QuoteFuture, QuoteSource};
use crate::{FetchFailure, Quote, SourceKey, SourceKind};

pub const DEFAULT_CHART_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Quote-API adapter over Yahoo's intraday chart endpoint.
///
/// One request per instrument (`range=1d&interval=1m`) yields both the
/// minute series and the quote fields carried in the chart `meta` block.
#[derive(Clone)]
pub struct YahooChartAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
    circuit_breaker: Arc<CircuitBreaker>,
}

impl YahooChartAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: DEFAULT_CHART_BASE_URL.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            circuit_breaker: Arc::new(CircuitBreaker::new(
                "yahoo_chart",
                CircuitBreakerConfig::default(),
            )),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    fn chart_url(&self, key: &SourceKey) -> String {
        format!(
            "{}/v8/finance/chart/{}?range=1d&interval=1m",
            self.base_url,
            urlencoding::encode(key.as_str())
        )
    }

    async fn fetch_chart(&self, key: &SourceKey) -> Result<ChartPayload, FetchFailure> {
        if !self.circuit_breaker.allow_request() {
            return Err(FetchFailure::circuit_open());
        }

        let request = HttpRequest::get(self.chart_url(key))
            .with_header("referer", "https://finance.yahoo.com/")
            .with_user_agent(BROWSER_USER_AGENT)
            .with_timeout_ms(self.timeout_ms);

        let in_flight = InFlight::new(&self.circuit_breaker);
        let outcome = self.http_client.execute(request).await;
        in_flight.settle();

        let response = outcome.map_err(|error| {
            self.circuit_breaker.record_failure();
            failure_from_transport(&error)
        })?;

        // 4xx means the upstream is alive and the key is bad; only
        // throttling and server errors count against the circuit.
        if !response.is_success() {
            if response.status == 429 || response.status >= 500 {
                self.circuit_breaker.record_failure();
            } else {
                self.circuit_breaker.record_success();
            }
            return Err(FetchFailure::http_status(response.status));
        }

        self.circuit_breaker.record_success();
        ChartPayload::parse(&response.body)
    }
}

impl QuoteSource for YahooChartAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::QuoteApi
    }

    fn fetch_quote<'a>(&'a self, key: &'a SourceKey) -> QuoteFuture<'a> {
        Box::pin(async move {
            match self.fetch_chart(key).await {
                Ok(payload) => {
                    let quote = payload.normalize();
                    debug!(key = %key, status = %quote.status(), "chart normalized");
                    quote
                }
                Err(failure) => {
                    warn!(
                        key = %key,
                        kind = failure.kind().as_str(),
                        error = failure.message(),
                        "chart fetch failed"
                    );
                    Quote::fetch_error(failure)
                }
            }
        })
    }
}

/// Counts a chart request against the breaker when its future is dropped
/// before the transport answers (a caller deadline fired first).
struct InFlight<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(breaker: &'a CircuitBreaker) -> Self {
        Self {
            breaker,
            armed: true,
        }
    }

    fn settle(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("chart request abandoned before the upstream answered");
            self.breaker.record_failure();
        }
    }
}

pub(crate) fn failure_from_transport(error: &HttpError) -> FetchFailure {
    match error.kind() {
        HttpErrorKind::Timeout => FetchFailure::timeout(error.message()),
        HttpErrorKind::Connect | HttpErrorKind::Body | HttpErrorKind::Other => {
            FetchFailure::transport(error.message())
        }
    }
}

// ============================================================================
// Normalized chart payload
// ============================================================================

/// Quote fields reported alongside the series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFields {
    pub regular_market_price: Option<Decimal>,
    pub current_price: Option<Decimal>,
    pub previous_close: Option<Decimal>,
}

/// Chart response after edge validation: either a non-empty minute series
/// or quote fields alone when the session has no bars yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartPayload {
    Series {
        first_open: Option<Decimal>,
        last_close: Decimal,
        fields: QuoteFields,
    },
    FieldsOnly(QuoteFields),
}

impl ChartPayload {
    pub fn parse(body: &str) -> Result<Self, FetchFailure> {
        let response: YahooChartResponse = serde_json::from_str(body)
            .map_err(|e| FetchFailure::parse(format!("failed to parse yahoo chart: {e}")))?;

        if let Some(error) = response.chart.error {
            return Err(FetchFailure::parse(format!(
                "yahoo chart API error: {}: {}",
                error.code.unwrap_or_default(),
                error.description.unwrap_or_default()
            )));
        }

        let result = response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| FetchFailure::parse("no chart result in response"))?;

        let fields = QuoteFields {
            regular_market_price: result.meta.regular_market_price.and_then(to_decimal),
            current_price: result.meta.current_price.and_then(to_decimal),
            previous_close: result
                .meta
                .previous_close
                .or(result.meta.chart_previous_close)
                .and_then(to_decimal),
        };

        let series = result.indicators.quote.into_iter().next().unwrap_or_default();
        let first_open = series.open.into_iter().flatten().find_map(to_decimal);
        let last_close = series.close.into_iter().flatten().filter_map(to_decimal).last();

        Ok(match last_close {
            Some(last_close) => Self::Series {
                first_open,
                last_close,
                fields,
            },
            None => Self::FieldsOnly(fields),
        })
    }

    /// Picks the current value and previous close, then derives the change.
    pub fn normalize(&self) -> Quote {
        match self {
            Self::Series {
                first_open,
                last_close,
                fields,
            } => Quote::from_prices(Some(*last_close), fields.previous_close.or(*first_open)),
            Self::FieldsOnly(fields) => Quote::from_prices(
                fields.regular_market_price.or(fields.current_price),
                fields.previous_close,
            ),
        }
    }
}

fn to_decimal(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64(value)
    } else {
        None
    }
}

// ============================================================================
// Yahoo Chart API Response Structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: YahooChartMeta,
    #[serde(default)]
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartMeta {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<f64>,
    #[serde(rename = "currentPrice", default)]
    current_price: Option<f64>,
    #[serde(rename = "previousClose", default)]
    previous_close: Option<f64>,
    #[serde(rename = "chartPreviousClose", default)]
    chart_previous_close: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}
