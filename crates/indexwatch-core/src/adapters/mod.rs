//! Provider adapters, one per response shape.

pub mod scraped_page;
pub mod yahoo;

pub use scraped_page::{ScrapedPageAdapter, KOSPI_NIGHT_FUTURES_URL};
pub use yahoo::{ChartPayload, QuoteFields, YahooChartAdapter, DEFAULT_CHART_BASE_URL};
