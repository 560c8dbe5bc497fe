//! Behavior tests for the source adapters.
//!
//! These tests drive each adapter through a scripted HTTP transport and check
//! that every upstream outcome (good data, empty data, bad status, transport
//! failure) is folded into a `Quote` instead of an error.

mod support;

use std::sync::Arc;

use indexwatch_core::{
    CircuitState, FailureKind, HttpError, HttpResponse, Quote, QuoteDisplay, QuoteSource,
    QuoteStatus, ScrapedPageAdapter, SourceKey, YahooChartAdapter,
};
use rust_decimal_macros::dec;

use support::{chart_body, ScriptedHttpClient};

const CHART_BASE: &str = "http://chart.test";
const PAGE_URL: &str = "http://night.test/kospi200/";

fn chart_adapter(http: Arc<ScriptedHttpClient>) -> YahooChartAdapter {
    YahooChartAdapter::new(http).with_base_url(CHART_BASE)
}

fn key(raw: &str) -> SourceKey {
    SourceKey::parse(raw).expect("valid key")
}

// =============================================================================
// Quote API: normalization
// =============================================================================

#[tokio::test]
async fn when_chart_has_series_change_is_measured_against_previous_close() {
    // Given: a chart whose latest bar closes at 100 after a previous close of 98
    let http = Arc::new(
        ScriptedHttpClient::new().route(CHART_BASE, Ok(HttpResponse::ok(chart_body(100.0, 98.0)))),
    );
    let adapter = chart_adapter(Arc::clone(&http));

    // When: the adapter fetches the instrument
    let quote = adapter.fetch_quote(&key("NQ=F")).await;

    // Then: the row is OK with price 100 and a +2.04% change
    assert_eq!(quote.status(), QuoteStatus::Ok);
    assert_eq!(quote.price(), Some(dec!(100)));
    assert_eq!(quote.change_percent().map(|c| c.round_dp(2)), Some(dec!(2.04)));
    assert_eq!(QuoteDisplay::of(&quote).change, "+2.04%");
}

#[tokio::test]
async fn when_price_falls_change_is_negative() {
    // Given: a close of 95 against a previous close of 100
    let http = Arc::new(
        ScriptedHttpClient::new().route(CHART_BASE, Ok(HttpResponse::ok(chart_body(95.0, 100.0)))),
    );
    let adapter = chart_adapter(http);

    // When
    let quote = adapter.fetch_quote(&key("ES=F")).await;

    // Then: the sign of the change follows price minus previous close
    assert_eq!(quote.change_percent(), Some(dec!(-5)));
    assert_eq!(QuoteDisplay::of(&quote).change, "-5.00%");
}

#[tokio::test]
async fn when_series_is_empty_quote_fields_are_used() {
    // Given: no minute bars yet, only the meta block
    let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":50,"previousClose":45},
        "indicators":{"quote":[{"open":[],"close":[]}]}}],"error":null}}"#;
    let http = Arc::new(ScriptedHttpClient::new().route(CHART_BASE, Ok(HttpResponse::ok(body))));
    let adapter = chart_adapter(http);

    // When
    let quote = adapter.fetch_quote(&key("^SOX")).await;

    // Then: the current price falls back to regularMarketPrice
    assert_eq!(quote.price(), Some(dec!(50)));
    assert_eq!(quote.change_percent().map(|c| c.round_dp(2)), Some(dec!(11.11)));
}

#[tokio::test]
async fn when_neither_series_nor_fields_exist_row_is_no_data() {
    // Given: a well-formed response without any price
    let body = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
    let http = Arc::new(ScriptedHttpClient::new().route(CHART_BASE, Ok(HttpResponse::ok(body))));
    let adapter = chart_adapter(http);

    // When
    let quote = adapter.fetch_quote(&key("^KQ11")).await;

    // Then
    assert_eq!(quote, Quote::NoData);
    assert_eq!(QuoteDisplay::of(&quote).price, "N/A");
}

#[tokio::test]
async fn request_targets_encoded_chart_path_with_browser_headers() {
    // Given
    let http = Arc::new(
        ScriptedHttpClient::new().route(CHART_BASE, Ok(HttpResponse::ok(chart_body(1.0, 1.0)))),
    );
    let adapter = chart_adapter(Arc::clone(&http)).with_timeout_ms(1_500);

    // When
    adapter.fetch_quote(&key("^KS11")).await;

    // Then: one GET to the chart endpoint with the caret percent-encoded
    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url,
        "http://chart.test/v8/finance/chart/%5EKS11?range=1d&interval=1m"
    );
    assert_eq!(requests[0].timeout_ms, 1_500);
    assert!(requests[0].headers.contains_key("user-agent"));
    assert!(requests[0].headers.contains_key("referer"));
}

// =============================================================================
// Quote API: failures
// =============================================================================

#[tokio::test]
async fn when_upstream_returns_error_status_row_is_fetch_error() {
    // Given
    let http = Arc::new(
        ScriptedHttpClient::new().route(CHART_BASE, Ok(HttpResponse::new(404, "{}"))),
    );
    let adapter = chart_adapter(http);

    // When
    let quote = adapter.fetch_quote(&key("YM=F")).await;

    // Then
    assert_eq!(quote.status(), QuoteStatus::FetchError);
    assert_eq!(quote.failure().map(|f| f.kind()), Some(FailureKind::HttpStatus));
    assert_eq!(QuoteDisplay::of(&quote).price, "Error");
}

#[tokio::test]
async fn when_body_is_not_json_row_is_parse_error() {
    // Given
    let http = Arc::new(
        ScriptedHttpClient::new().route(CHART_BASE, Ok(HttpResponse::ok("<html>busy</html>"))),
    );
    let adapter = chart_adapter(http);

    // When
    let quote = adapter.fetch_quote(&key("NQ=F")).await;

    // Then
    assert_eq!(quote.failure().map(|f| f.kind()), Some(FailureKind::Parse));
}

#[tokio::test]
async fn when_transport_times_out_row_records_timeout() {
    // Given
    let http = Arc::new(
        ScriptedHttpClient::new().route(CHART_BASE, Err(HttpError::timeout("deadline elapsed"))),
    );
    let adapter = chart_adapter(http);

    // When
    let quote = adapter.fetch_quote(&key("NQ=F")).await;

    // Then
    assert_eq!(quote.failure().map(|f| f.kind()), Some(FailureKind::Timeout));
}

#[tokio::test]
async fn repeated_connection_failures_open_the_circuit() {
    // Given: an unreachable chart host
    let http = Arc::new(
        ScriptedHttpClient::new().route(CHART_BASE, Err(HttpError::connect("refused"))),
    );
    let adapter = chart_adapter(Arc::clone(&http));

    // When: the default threshold of failures is reached
    for _ in 0..3 {
        let quote = adapter.fetch_quote(&key("NQ=F")).await;
        assert_eq!(quote.failure().map(|f| f.kind()), Some(FailureKind::Transport));
    }
    let short_circuited = adapter.fetch_quote(&key("ES=F")).await;

    // Then: the next call fails fast without touching the network
    assert_eq!(adapter.circuit_breaker().state(), CircuitState::Open);
    assert_eq!(
        short_circuited.failure().map(|f| f.kind()),
        Some(FailureKind::CircuitOpen)
    );
    assert_eq!(http.requests().len(), 3);
}

// =============================================================================
// Scraped page
// =============================================================================

#[tokio::test]
async fn reachable_page_reports_connected_placeholder() {
    // Given: the page answers 200 with markup whose value is script-driven
    let http = Arc::new(ScriptedHttpClient::new().route(
        PAGE_URL,
        Ok(HttpResponse::ok(
            "<html><head><title>Night Futures</title></head><body><span id=\"price\"></span>",
        )),
    ));
    let adapter = ScrapedPageAdapter::new(http.clone()).with_user_agent("watch-test/1.0");

    // When
    let quote = adapter.fetch_quote(&key(PAGE_URL)).await;

    // Then: status OK with placeholder text, and no numbers are invented
    assert_eq!(quote, Quote::Connected);
    assert_eq!(quote.status(), QuoteStatus::Ok);
    assert_eq!(quote.price(), None);
    let display = QuoteDisplay::of(&quote);
    assert_eq!(display.price, "Connected");
    assert_eq!(display.change, "Pending");

    let requests = http.requests();
    assert_eq!(requests[0].url, PAGE_URL);
    assert_eq!(
        requests[0].headers.get("user-agent").map(String::as_str),
        Some("watch-test/1.0")
    );
}

#[tokio::test]
async fn page_server_error_is_fetch_error() {
    // Given
    let http = Arc::new(
        ScriptedHttpClient::new().route(PAGE_URL, Ok(HttpResponse::new(500, "oops"))),
    );
    let adapter = ScrapedPageAdapter::new(http);

    // When
    let quote = adapter.fetch_quote(&key(PAGE_URL)).await;

    // Then
    assert_eq!(quote.status(), QuoteStatus::FetchError);
    assert_eq!(quote.failure().map(|f| f.kind()), Some(FailureKind::HttpStatus));
}

#[tokio::test]
async fn page_timeout_is_fetch_error() {
    // Given
    let http = Arc::new(
        ScriptedHttpClient::new().route(PAGE_URL, Err(HttpError::timeout("5s elapsed"))),
    );
    let adapter = ScrapedPageAdapter::new(http);

    // When
    let quote = adapter.fetch_quote(&key(PAGE_URL)).await;

    // Then
    assert_eq!(quote.failure().map(|f| f.kind()), Some(FailureKind::Timeout));
    assert_eq!(QuoteDisplay::of(&quote).change, "Error");
}
