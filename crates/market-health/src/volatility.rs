//! Realised volatility over trade-to-trade price returns
//!
//! Independent of the health score. Returns are simple returns between
//! consecutive trades inside the window, taken in the order the trades were
//! supplied unless chronological sorting is switched on.

use crate::calibration::HOUR_MS;
use crate::error::MarketHealthError;
use crate::stats::{mean, round_to, std_dev};
use crate::types::Trade;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};

pub const HOURS_PER_YEAR: f64 = 365.0 * 24.0;

/// Length of the trailing window, in hours. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct VolatilityWindow(f64);

impl VolatilityWindow {
    pub const ONE_HOUR: Self = Self(1.0);
    pub const ONE_DAY: Self = Self(24.0);

    pub fn hours(hours: f64) -> Result<Self, MarketHealthError> {
        if hours.is_finite() && hours > 0.0 {
            Ok(Self(hours))
        } else {
            Err(MarketHealthError::InvalidWindow(hours.to_string()))
        }
    }

    /// Parse `"4h"` or a bare `"4"`.
    pub fn parse(s: &str) -> Result<Self, MarketHealthError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix('h')
            .or_else(|| trimmed.strip_suffix('H'))
            .unwrap_or(trimmed);
        let hours: f64 = digits
            .parse()
            .map_err(|_| MarketHealthError::InvalidWindow(s.to_string()))?;
        Self::hours(hours).map_err(|_| MarketHealthError::InvalidWindow(s.to_string()))
    }

    pub fn as_hours(&self) -> f64 {
        self.0
    }

    pub fn as_millis(&self) -> i64 {
        (self.0 * HOUR_MS as f64).round() as i64
    }

    pub fn label(&self) -> String {
        format!("{}h", self.0)
    }

    /// Windows of this length in a year of continuous trading
    pub fn periods_per_year(&self, hours_per_year: f64) -> f64 {
        hours_per_year / self.0
    }
}

impl Default for VolatilityWindow {
    fn default() -> Self {
        Self::ONE_HOUR
    }
}

impl TryFrom<f64> for VolatilityWindow {
    type Error = MarketHealthError;

    fn try_from(hours: f64) -> Result<Self, Self::Error> {
        Self::hours(hours)
    }
}

impl From<VolatilityWindow> for f64 {
    fn from(window: VolatilityWindow) -> Self {
        window.0
    }
}

impl fmt::Display for VolatilityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpretation {
    InsufficientData,
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Interpretation {
    /// Step function on the window volatility, in percent
    pub fn from_pct(volatility_pct: f64) -> Self {
        if volatility_pct < 0.5 {
            Interpretation::VeryLow
        } else if volatility_pct < 1.5 {
            Interpretation::Low
        } else if volatility_pct < 3.0 {
            Interpretation::Moderate
        } else if volatility_pct < 5.0 {
            Interpretation::High
        } else {
            Interpretation::VeryHigh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interpretation::InsufficientData => "insufficient_data",
            Interpretation::VeryLow => "very_low",
            Interpretation::Low => "low",
            Interpretation::Moderate => "moderate",
            Interpretation::High => "high",
            Interpretation::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityResult {
    pub volatility_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annualized_volatility_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<usize>,
    pub interpretation: Interpretation,
}

impl VolatilityResult {
    pub fn insufficient_data() -> Self {
        Self {
            volatility_pct: 0.0,
            annualized_volatility_pct: None,
            price_high: None,
            price_low: None,
            sample_size: None,
            interpretation: Interpretation::InsufficientData,
        }
    }

    pub fn is_sufficient(&self) -> bool {
        self.interpretation != Interpretation::InsufficientData
    }
}

/// Consecutive simple returns `(p[i] - p[i-1]) / p[i-1]`
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityAnalyzer {
    hours_per_year: f64,
    sort_chronologically: bool,
}

impl Default for VolatilityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl VolatilityAnalyzer {
    pub fn new() -> Self {
        Self {
            hours_per_year: HOURS_PER_YEAR,
            sort_chronologically: false,
        }
    }

    pub fn with_hours_per_year(mut self, hours_per_year: f64) -> Self {
        self.hours_per_year = hours_per_year;
        self
    }

    /// Sort the in-window trades by execution time before differencing.
    pub fn sort_chronologically(mut self, enabled: bool) -> Self {
        self.sort_chronologically = enabled;
        self
    }

    #[instrument(skip_all, fields(trades = trades.len(), window = %window))]
    pub fn analyze(
        &self,
        trades: &[Trade],
        window: VolatilityWindow,
        now: DateTime<Utc>,
    ) -> VolatilityResult {
        if trades.len() < 2 {
            return VolatilityResult::insufficient_data();
        }

        let cutoff = now.timestamp_millis() - window.as_millis();
        let mut in_window: Vec<(i64, f64)> = trades
            .iter()
            .filter(|t| t.executed_at >= cutoff)
            .map(|t| (t.executed_at, t.price()))
            .filter(|(_, price)| *price > 0.0)
            .collect();

        if in_window.len() < 2 {
            debug!(in_window = in_window.len(), "Not enough priced trades in window");
            return VolatilityResult::insufficient_data();
        }

        let chronological = in_window.windows(2).all(|w| w[0].0 <= w[1].0);
        if !chronological {
            if self.sort_chronologically {
                in_window.sort_by_key(|(ts, _)| *ts);
            } else {
                warn!("Trades are not in execution order; returns follow input order");
            }
        }

        let prices: Vec<f64> = in_window.iter().map(|(_, price)| *price).collect();
        let returns = simple_returns(&prices);
        let sigma = std_dev(&returns);

        let volatility_pct = sigma * 100.0;
        let annualized = sigma * window.periods_per_year(self.hours_per_year).sqrt() * 100.0;

        let (low, high) = prices
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &p| (lo.min(p), hi.max(p)));

        debug!(
            mean_return = mean(&returns),
            volatility_pct,
            samples = prices.len(),
            "Volatility computed"
        );

        VolatilityResult {
            volatility_pct: round_to(volatility_pct, 4),
            annualized_volatility_pct: Some(round_to(annualized, 2)),
            price_high: Some(high),
            price_low: Some(low),
            sample_size: Some(prices.len()),
            interpretation: Interpretation::from_pct(volatility_pct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::MINUTE_MS;
    use crate::clock::{Clock, FixedClock};
    use assert_matches::assert_matches;

    const NOW: i64 = 1_700_000_000_000;

    fn now() -> DateTime<Utc> {
        FixedClock::from_millis(NOW).now()
    }

    fn series(prices: &[&str]) -> Vec<Trade> {
        let n = prices.len() as i64;
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| Trade::new(*p, "1", NOW - (n - i as i64) * MINUTE_MS))
            .collect()
    }

    #[test]
    fn test_fewer_than_two_trades() {
        let analyzer = VolatilityAnalyzer::new();
        let result = analyzer.analyze(&series(&["100"]), VolatilityWindow::ONE_HOUR, now());
        assert_eq!(result, VolatilityResult::insufficient_data());
        assert_eq!(result.volatility_pct, 0.0);
        assert!(!result.is_sufficient());
    }

    #[test]
    fn test_one_trade_in_window() {
        let mut trades = series(&["100"]);
        trades.push(Trade::new("105", "1", NOW - 5 * 60 * MINUTE_MS));
        let result = VolatilityAnalyzer::new().analyze(&trades, VolatilityWindow::ONE_HOUR, now());
        assert_eq!(result.interpretation, Interpretation::InsufficientData);
    }

    #[test]
    fn test_zero_prices_filtered() {
        let trades = series(&["100", "0", "abc"]);
        let result = VolatilityAnalyzer::new().analyze(&trades, VolatilityWindow::ONE_HOUR, now());
        assert_eq!(result.interpretation, Interpretation::InsufficientData);
    }

    #[test]
    fn test_end_to_end_example() {
        let trades = series(&["100", "101", "99", "100.5"]);
        let result = VolatilityAnalyzer::new().analyze(&trades, VolatilityWindow::ONE_HOUR, now());

        // returns [0.01, -0.019802, 0.015152], population σ ≈ 0.015407
        assert_eq!(result.volatility_pct, 1.5407);
        assert_eq!(result.interpretation, Interpretation::Moderate);
        assert_eq!(result.price_high, Some(101.0));
        assert_eq!(result.price_low, Some(99.0));
        assert_eq!(result.sample_size, Some(4));

        let annualized = result.annualized_volatility_pct.unwrap();
        let expected = result.volatility_pct * (8760.0f64).sqrt();
        assert!((annualized - expected).abs() < 0.05);
    }

    #[test]
    fn test_returns() {
        let returns = simple_returns(&[100.0, 101.0, 99.0, 100.5]);
        assert_eq!(returns.len(), 3);
        assert!((returns[0] - 0.01).abs() < 1e-9);
        assert!((returns[1] + 0.019_802).abs() < 1e-6);
        assert!((returns[2] - 0.015_152).abs() < 1e-6);
    }

    #[test]
    fn test_flat_prices_very_low() {
        let trades = series(&["50", "50", "50"]);
        let result = VolatilityAnalyzer::new().analyze(&trades, VolatilityWindow::ONE_HOUR, now());
        assert_eq!(result.volatility_pct, 0.0);
        assert_eq!(result.annualized_volatility_pct, Some(0.0));
        assert_eq!(result.interpretation, Interpretation::VeryLow);
    }

    #[test]
    fn test_wider_window_includes_older_trades() {
        let mut trades = series(&["100", "110"]);
        trades.insert(0, Trade::new("90", "1", NOW - 3 * 60 * MINUTE_MS));

        let one_hour = VolatilityAnalyzer::new().analyze(&trades, VolatilityWindow::ONE_HOUR, now());
        let four_hours = VolatilityAnalyzer::new().analyze(
            &trades,
            VolatilityWindow::parse("4h").unwrap(),
            now(),
        );

        assert_eq!(one_hour.sample_size, Some(2));
        assert_eq!(four_hours.sample_size, Some(3));
    }

    #[test]
    fn test_input_order_preserved_by_default() {
        let trades = vec![
            Trade::new("100", "1", NOW - MINUTE_MS),
            Trade::new("110", "1", NOW - 3 * MINUTE_MS),
            Trade::new("100", "1", NOW - 2 * MINUTE_MS),
        ];
        let literal = VolatilityAnalyzer::new().analyze(&trades, VolatilityWindow::ONE_HOUR, now());
        let sorted = VolatilityAnalyzer::new()
            .sort_chronologically(true)
            .analyze(&trades, VolatilityWindow::ONE_HOUR, now());

        // literal: 100 → 110 → 100; sorted: 110 → 100 → 100
        assert!((literal.volatility_pct - 9.5455).abs() < 1e-3, "{}", literal.volatility_pct);
        assert!((sorted.volatility_pct - 4.5455).abs() < 1e-3, "{}", sorted.volatility_pct);
    }

    #[test]
    fn test_interpretation_steps() {
        assert_eq!(Interpretation::from_pct(0.49), Interpretation::VeryLow);
        assert_eq!(Interpretation::from_pct(0.5), Interpretation::Low);
        assert_eq!(Interpretation::from_pct(1.5), Interpretation::Moderate);
        assert_eq!(Interpretation::from_pct(3.0), Interpretation::High);
        assert_eq!(Interpretation::from_pct(5.0), Interpretation::VeryHigh);
    }

    #[test]
    fn test_window_parse() {
        assert_eq!(VolatilityWindow::parse("4h").unwrap().as_hours(), 4.0);
        assert_eq!(VolatilityWindow::parse("12").unwrap().as_hours(), 12.0);
        assert_eq!(VolatilityWindow::parse("24h").unwrap().label(), "24h");
        assert_matches!(VolatilityWindow::parse("0h"), Err(MarketHealthError::InvalidWindow(_)));
        assert_matches!(VolatilityWindow::parse("-1h"), Err(MarketHealthError::InvalidWindow(_)));
        assert_matches!(VolatilityWindow::parse("soon"), Err(MarketHealthError::InvalidWindow(_)));
        assert!(VolatilityWindow::hours(f64::NAN).is_err());
    }

    #[test]
    fn test_result_serialization_omits_absent_fields() {
        let json = serde_json::to_value(VolatilityResult::insufficient_data()).unwrap();
        assert_eq!(json["interpretation"], "insufficient_data");
        assert_eq!(json["volatility_pct"], 0.0);
        assert!(json.get("sample_size").is_none());
    }
}
