//! Shared value types for market health evaluation
//!
//! Upstream venues publish prices and quantities as decimal strings. They are
//! kept verbatim here and parsed to `f64` at the point of arithmetic.

use crate::error::MarketHealthError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Parse an upstream decimal string.
///
/// Text that does not parse becomes `NaN`. No further validation is done here;
/// a `NaN` flowing into a scorer degrades that component to 0.
pub fn parse_decimal(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Book side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    Buy,
    Sell,
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSide::Buy => write!(f, "buy"),
            BookSide::Sell => write!(f, "sell"),
        }
    }
}

/// One resting order-book level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub price: String,
    pub quantity: String,
}

impl Order {
    pub fn new(price: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            price: price.into(),
            quantity: quantity.into(),
        }
    }

    pub fn price(&self) -> f64 {
        parse_decimal(&self.price)
    }

    pub fn quantity(&self) -> f64 {
        parse_decimal(&self.quantity)
    }

    /// price × quantity
    pub fn notional(&self) -> f64 {
        self.price() * self.quantity()
    }
}

/// Order book snapshot
///
/// `buys` must be ordered highest price first and `sells` lowest price first.
/// Scorers read `buys[0]`/`sells[0]` as best bid/ask without re-sorting; use
/// [`OrderBookSnapshot::check_ordering`] at ingestion to enforce this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    #[serde(default)]
    pub buys: Vec<Order>,
    #[serde(default)]
    pub sells: Vec<Order>,
}

impl OrderBookSnapshot {
    pub fn new(buys: Vec<Order>, sells: Vec<Order>) -> Self {
        Self { buys, sells }
    }

    pub fn is_two_sided(&self) -> bool {
        !self.buys.is_empty() && !self.sells.is_empty()
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.buys.first().map(Order::price)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.sells.first().map(Order::price)
    }

    pub fn mid_price(&self) -> Option<f64> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some((bid + ask) / 2.0)
    }

    /// Verify the best-first invariant on both sides.
    ///
    /// Levels with unparseable prices are skipped; they degrade scoring but
    /// say nothing about ordering.
    pub fn check_ordering(&self) -> Result<(), MarketHealthError> {
        if !is_ordered(&self.buys, |prev, next| prev >= next) {
            return Err(MarketHealthError::UnsortedBook {
                side: BookSide::Buy,
            });
        }

        if !is_ordered(&self.sells, |prev, next| prev <= next) {
            return Err(MarketHealthError::UnsortedBook {
                side: BookSide::Sell,
            });
        }

        Ok(())
    }

    /// Re-sort both sides best-first. Levels with unparseable prices go last.
    pub fn sort_best_first(&mut self) {
        self.buys
            .sort_by(|a, b| compare_nan_last(a.price(), b.price(), Ordering::reverse));
        self.sells
            .sort_by(|a, b| compare_nan_last(a.price(), b.price(), |o| o));
    }
}

fn is_ordered(levels: &[Order], in_order: impl Fn(f64, f64) -> bool) -> bool {
    let prices: Vec<f64> = levels
        .iter()
        .map(Order::price)
        .filter(|p| !p.is_nan())
        .collect();
    prices.windows(2).all(|w| in_order(w[0], w[1]))
}

/// NaN sorts after every number; `direction` applies to numeric comparisons only.
fn compare_nan_last(a: f64, b: f64, direction: impl Fn(Ordering) -> Ordering) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => direction(a.partial_cmp(&b).unwrap_or(Ordering::Equal)),
    }
}

/// Executed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub price: String,
    pub quantity: String,
    /// Execution time, epoch milliseconds
    pub executed_at: i64,
}

impl Trade {
    pub fn new(price: impl Into<String>, quantity: impl Into<String>, executed_at: i64) -> Self {
        Self {
            price: price.into(),
            quantity: quantity.into(),
            executed_at,
        }
    }

    pub fn price(&self) -> f64 {
        parse_decimal(&self.price)
    }

    pub fn quantity(&self) -> f64 {
        parse_decimal(&self.quantity)
    }

    pub fn notional(&self) -> f64 {
        self.price() * self.quantity()
    }
}

/// Upstream market identifier: `0x` followed by 64 hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MarketId(String);

impl MarketId {
    pub fn parse(s: &str) -> Result<Self, MarketHealthError> {
        let valid = s.len() == 66
            && s.starts_with("0x")
            && s[2..].chars().all(|c| c.is_ascii_hexdigit());
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(MarketHealthError::InvalidMarketId(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MarketId {
    type Error = MarketHealthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MarketId> for String {
    fn from(id: MarketId) -> Self {
        id.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn book(bids: &[&str], asks: &[&str]) -> OrderBookSnapshot {
        OrderBookSnapshot::new(
            bids.iter().map(|p| Order::new(*p, "1")).collect(),
            asks.iter().map(|p| Order::new(*p, "1")).collect(),
        )
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1.25"), 1.25);
        assert_eq!(parse_decimal(" 42 "), 42.0);
        assert!(parse_decimal("abc").is_nan());
        assert!(parse_decimal("").is_nan());
    }

    #[test]
    fn test_best_prices_and_mid() {
        let b = book(&["99", "98"], &["101", "102"]);
        assert_eq!(b.best_bid(), Some(99.0));
        assert_eq!(b.best_ask(), Some(101.0));
        assert_eq!(b.mid_price(), Some(100.0));
    }

    #[test]
    fn test_empty_side_has_no_mid() {
        let b = book(&[], &["101"]);
        assert!(!b.is_two_sided());
        assert_eq!(b.mid_price(), None);
    }

    #[test]
    fn test_check_ordering_accepts_best_first() {
        let b = book(&["99", "98", "98"], &["101", "101", "105"]);
        assert!(b.check_ordering().is_ok());
    }

    #[test]
    fn test_check_ordering_rejects_unsorted_bids() {
        let b = book(&["98", "99"], &["101"]);
        assert_matches!(
            b.check_ordering(),
            Err(MarketHealthError::UnsortedBook { side: BookSide::Buy })
        );
    }

    #[test]
    fn test_check_ordering_rejects_unsorted_asks() {
        let b = book(&["99"], &["102", "101"]);
        assert_matches!(
            b.check_ordering(),
            Err(MarketHealthError::UnsortedBook { side: BookSide::Sell })
        );
    }

    #[test]
    fn test_sort_best_first() {
        let mut b = book(&["97", "bad", "99", "98"], &["103", "101", "102"]);
        b.sort_best_first();

        let bids: Vec<&str> = b.buys.iter().map(|o| o.price.as_str()).collect();
        let asks: Vec<&str> = b.sells.iter().map(|o| o.price.as_str()).collect();
        assert_eq!(bids, vec!["99", "98", "97", "bad"]);
        assert_eq!(asks, vec!["101", "102", "103"]);
    }

    #[test]
    fn test_sort_keeps_valid_best_bid_ahead_of_bad_level() {
        let mut b = book(&["bad", "98", "99"], &["n/a", "102", "101"]);
        b.sort_best_first();

        assert_eq!(b.best_bid(), Some(99.0));
        assert_eq!(b.best_ask(), Some(101.0));
        assert_eq!(b.buys.last().map(|o| o.price.as_str()), Some("bad"));
        assert_eq!(b.sells.last().map(|o| o.price.as_str()), Some("n/a"));
        assert!(b.check_ordering().is_ok());
    }

    #[test]
    fn test_check_ordering_skips_unparseable_levels() {
        let b = book(&["99", "bad", "98"], &["101", "", "102"]);
        assert!(b.check_ordering().is_ok());

        let unsorted = book(&["98", "bad", "99"], &["101"]);
        assert_matches!(
            unsorted.check_ordering(),
            Err(MarketHealthError::UnsortedBook { side: BookSide::Buy })
        );
    }

    #[test]
    fn test_trade_deserializes_camel_case() {
        let json = r#"{"price":"10.5","quantity":"2","executedAt":1700000000000}"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.executed_at, 1_700_000_000_000);
        assert_eq!(trade.notional(), 21.0);
    }

    #[test]
    fn test_market_id() {
        let valid = format!("0x{}", "a1".repeat(32));
        assert!(MarketId::parse(&valid).is_ok());

        assert_matches!(
            MarketId::parse("0x1234"),
            Err(MarketHealthError::InvalidMarketId(_))
        );
        let bad_hex = format!("0x{}", "zz".repeat(32));
        assert!(MarketId::parse(&bad_hex).is_err());
    }
}
