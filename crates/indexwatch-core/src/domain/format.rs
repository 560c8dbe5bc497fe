use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::{Direction, Quote};

pub const NO_DATA_TEXT: &str = "N/A";
pub const ERROR_TEXT: &str = "Error";
pub const CONNECTED_TEXT: &str = "Connected";
pub const PENDING_TEXT: &str = "Pending";

/// Price with thousands separators and two decimals, e.g. `21,034.50`.
pub fn format_price(price: Decimal) -> String {
    let sign = if price.is_sign_negative() && !price.is_zero() {
        "-"
    } else {
        ""
    };
    let fixed = format!("{:.2}", round2(price.abs()));
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}{}.{fraction}", group_thousands(integer))
}

/// Percent change with explicit sign and two decimals, e.g. `+1.23%`.
///
/// The sign follows the unrounded value so it always agrees with [`Direction`].
pub fn format_change_percent(change: Decimal) -> String {
    let sign = if change < Decimal::ZERO { '-' } else { '+' };
    format!("{sign}{:.2}%", round2(change.abs()))
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Display-ready text for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteDisplay {
    pub price: String,
    pub change: String,
    pub direction: Direction,
}

impl QuoteDisplay {
    pub fn of(quote: &Quote) -> Self {
        let (price, change) = match quote {
            Quote::Priced {
                price,
                change_percent,
                ..
            } => (format_price(*price), format_change_percent(*change_percent)),
            Quote::Connected => (CONNECTED_TEXT.to_owned(), PENDING_TEXT.to_owned()),
            Quote::NoData => (NO_DATA_TEXT.to_owned(), NO_DATA_TEXT.to_owned()),
            Quote::FetchError(_) => (ERROR_TEXT.to_owned(), ERROR_TEXT.to_owned()),
        };

        Self {
            price,
            change,
            direction: quote.direction(),
        }
    }
}
