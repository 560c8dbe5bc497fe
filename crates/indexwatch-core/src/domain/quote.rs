use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Coarse outcome of one adapter call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Ok,
    NoData,
    FetchError,
}

impl QuoteStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NoData => "NO_DATA",
            Self::FetchError => "FETCH_ERROR",
        }
    }
}

impl Display for QuoteStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification recorded with every `FETCH_ERROR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection refused, DNS failure, body read error.
    Transport,
    /// The request or the whole adapter call exceeded its deadline.
    Timeout,
    /// Upstream answered with a non-2xx status.
    HttpStatus,
    /// Body did not match the expected shape.
    Parse,
    /// The adapter's circuit breaker refused the call.
    CircuitOpen,
    /// The adapter task panicked or was cancelled.
    Internal,
}

impl FailureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Timeout => "timeout",
            Self::HttpStatus => "http_status",
            Self::Parse => "parse",
            Self::CircuitOpen => "circuit_open",
            Self::Internal => "internal",
        }
    }
}

/// Why an adapter call produced no quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    kind: FailureKind,
    message: String,
}

impl FetchFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn http_status(status: u16) -> Self {
        Self::new(
            FailureKind::HttpStatus,
            format!("upstream returned status {status}"),
        )
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Parse, message)
    }

    pub fn circuit_open() -> Self {
        Self::new(
            FailureKind::CircuitOpen,
            "circuit breaker is open; skipping upstream call",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Internal, message)
    }

    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for FetchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.kind.as_str())
    }
}

/// Sign of the day's move, used by presentation layers to pick a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn of(change: Decimal) -> Self {
        if change > Decimal::ZERO {
            Self::Up
        } else if change < Decimal::ZERO {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

/// Normalized result of one adapter call.
///
/// `price` and `change_percent` exist only on [`Quote::Priced`]. The
/// [`Quote::Connected`] sentinel reports `OK` without numbers: the source was
/// reachable but cannot yield a value server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quote {
    Priced {
        price: Decimal,
        change_percent: Decimal,
        previous_close: Decimal,
    },
    Connected,
    NoData,
    FetchError(FetchFailure),
}

impl Quote {
    /// Builds a priced quote from the current value and the previous close.
    ///
    /// Missing or zero inputs yield `NoData`; a zero previous close cannot
    /// produce a percentage.
    pub fn from_prices(current: Option<Decimal>, previous_close: Option<Decimal>) -> Self {
        let (Some(price), Some(previous_close)) = (current, previous_close) else {
            return Self::NoData;
        };
        if price.is_zero() || previous_close.is_zero() {
            return Self::NoData;
        }

        let change_percent = price
            .checked_sub(previous_close)
            .and_then(|delta| delta.checked_div(previous_close))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

        match change_percent {
            Some(change_percent) => Self::Priced {
                price,
                change_percent,
                previous_close,
            },
            None => Self::NoData,
        }
    }

    pub fn fetch_error(failure: FetchFailure) -> Self {
        Self::FetchError(failure)
    }

    pub const fn status(&self) -> QuoteStatus {
        match self {
            Self::Priced { .. } | Self::Connected => QuoteStatus::Ok,
            Self::NoData => QuoteStatus::NoData,
            Self::FetchError(_) => QuoteStatus::FetchError,
        }
    }

    pub const fn price(&self) -> Option<Decimal> {
        match self {
            Self::Priced { price, .. } => Some(*price),
            _ => None,
        }
    }

    pub const fn change_percent(&self) -> Option<Decimal> {
        match self {
            Self::Priced { change_percent, .. } => Some(*change_percent),
            _ => None,
        }
    }

    pub const fn previous_close(&self) -> Option<Decimal> {
        match self {
            Self::Priced { previous_close, .. } => Some(*previous_close),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::FetchError(failure) => Some(failure),
            _ => None,
        }
    }

    /// Placeholder and failed rows are always flat.
    pub fn direction(&self) -> Direction {
        self.change_percent()
            .map(Direction::of)
            .unwrap_or(Direction::Flat)
    }
}

impl Serialize for Quote {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Quote", 5)?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("price", &self.price())?;
        state.serialize_field("change_percent", &self.change_percent())?;
        state.serialize_field("direction", &self.direction())?;
        state.serialize_field("error", &self.failure())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn priced_quote_carries_signed_change() {
        let quote = Quote::from_prices(Some(dec!(100)), Some(dec!(98)));
        assert_eq!(quote.status(), QuoteStatus::Ok);
        assert_eq!(quote.price(), Some(dec!(100)));
        assert_eq!(
            quote.change_percent().map(|c| c.round_dp(2)),
            Some(dec!(2.04))
        );
        assert_eq!(quote.direction(), Direction::Up);
    }

    #[test]
    fn falling_price_has_negative_change() {
        let quote = Quote::from_prices(Some(dec!(95.5)), Some(dec!(100)));
        assert_eq!(quote.change_percent(), Some(dec!(-4.5)));
        assert_eq!(quote.direction(), Direction::Down);
    }

    #[test]
    fn missing_or_zero_inputs_are_no_data() {
        assert_eq!(Quote::from_prices(None, Some(dec!(1))), Quote::NoData);
        assert_eq!(Quote::from_prices(Some(dec!(1)), None), Quote::NoData);
        assert_eq!(Quote::from_prices(Some(dec!(10)), Some(dec!(0))), Quote::NoData);
        assert_eq!(Quote::from_prices(Some(dec!(0)), Some(dec!(10))), Quote::NoData);
    }

    #[test]
    fn non_priced_quotes_expose_no_numbers() {
        for quote in [
            Quote::Connected,
            Quote::NoData,
            Quote::fetch_error(FetchFailure::timeout("slow")),
        ] {
            assert_eq!(quote.price(), None);
            assert_eq!(quote.change_percent(), None);
            assert_eq!(quote.direction(), Direction::Flat);
        }
        assert_eq!(Quote::Connected.status(), QuoteStatus::Ok);
    }

    #[test]
    fn serializes_status_and_nullable_fields() {
        let json = serde_json::to_value(Quote::NoData).expect("serializable");
        assert_eq!(json["status"], "NO_DATA");
        assert!(json["price"].is_null());
        assert!(json["error"].is_null());

        let failed = Quote::fetch_error(FetchFailure::http_status(503));
        let json = serde_json::to_value(failed).expect("serializable");
        assert_eq!(json["status"], "FETCH_ERROR");
        assert_eq!(json["error"]["kind"], "http_status");
    }
}
