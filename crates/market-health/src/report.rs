//! Per-market report and side-by-side comparison
//!
//! Upstream summary fields are optional: `None` means the venue did not
//! report a value, which is different from a market that traded nothing.

use crate::error::MarketHealthError;
use crate::health::{Grade, HealthScoreResult};
use crate::types::OrderBookSnapshot;
use crate::volatility::VolatilityResult;
use serde::{Deserialize, Serialize};

pub const MIN_COMPARE_MARKETS: usize = 2;
pub const MAX_COMPARE_MARKETS: usize = 5;

/// 24h venue summary for one market
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    #[serde(default)]
    pub last_price: Option<f64>,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default)]
    pub change_24h: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
}

impl MarketStats {
    pub fn is_empty(&self) -> bool {
        self.last_price.is_none()
            && self.high_24h.is_none()
            && self.low_24h.is_none()
            && self.change_24h.is_none()
            && self.volume_24h.is_none()
    }
}

/// Top-of-book view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookOverview {
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    pub bid_levels: usize,
    pub ask_levels: usize,
}

impl OrderBookOverview {
    pub fn from_book(book: &OrderBookSnapshot) -> Self {
        Self {
            best_bid: book.best_bid().filter(|p| p.is_finite()),
            best_ask: book.best_ask().filter(|p| p.is_finite()),
            bid_levels: book.buys.len(),
            ask_levels: book.sells.len(),
        }
    }
}

/// Volatility over the short and the daily window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityPair {
    #[serde(rename = "1h")]
    pub one_hour: VolatilityResult,
    #[serde(rename = "24h")]
    pub one_day: VolatilityResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketReport {
    pub market_id: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub health: HealthScoreResult,
    pub volatility: VolatilityPair,
    pub orderbook: OrderBookOverview,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<MarketStats>,
}

/// One row of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub market_id: String,
    pub health_score: u8,
    pub grade: Grade,
    pub status: String,
    pub volatility_1h: f64,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
}

impl ComparisonEntry {
    pub fn new(
        market_id: impl Into<String>,
        health: &HealthScoreResult,
        volatility_1h: &VolatilityResult,
        book: &OrderBookSnapshot,
    ) -> Self {
        let overview = OrderBookOverview::from_book(book);
        Self {
            market_id: market_id.into(),
            health_score: health.health_score,
            grade: health.grade,
            status: health.status.clone(),
            volatility_1h: volatility_1h.volatility_pct,
            best_bid: overview.best_bid,
            best_ask: overview.best_ask,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub best_market: String,
    pub ranking: Vec<ComparisonEntry>,
}

/// Rank markets by health score, best first. Ties keep input order.
pub fn compare_markets(mut entries: Vec<ComparisonEntry>) -> Result<Comparison, MarketHealthError> {
    let count = entries.len();
    if !(MIN_COMPARE_MARKETS..=MAX_COMPARE_MARKETS).contains(&count) {
        return Err(MarketHealthError::InvalidComparison {
            count,
            min: MIN_COMPARE_MARKETS,
            max: MAX_COMPARE_MARKETS,
        });
    }

    entries.sort_by(|a, b| b.health_score.cmp(&a.health_score));
    let best_market = entries[0].market_id.clone();

    Ok(Comparison {
        best_market,
        ranking: entries,
    })
}
