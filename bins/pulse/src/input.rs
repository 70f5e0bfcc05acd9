//! Market input files
//!
//! One JSON document per market:
//!
//! ```json
//! {
//!   "market_id": "0x…",
//!   "orderbook": { "buys": [{"price": "0.52", "quantity": "100"}], "sells": [] },
//!   "trades": [{"price": "0.52", "quantity": "10", "executedAt": 1700000000000}],
//!   "stats": { "last_price": 0.52 },
//!   "volume_history": [12.1, 11.8]
//! }
//! ```

use anyhow::{Context, Result};
use futures::future::try_join_all;
use market_health::{MarketId, MarketStats, MarketView, OrderBookSnapshot, Trade};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct MarketInput {
    pub market_id: MarketId,
    #[serde(default)]
    pub orderbook: OrderBookSnapshot,
    #[serde(default)]
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub stats: Option<MarketStats>,
    /// Past per-window log-volume totals for the collapse check
    #[serde(default)]
    pub volume_history: Vec<f64>,
}

impl MarketInput {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse market input")
    }

    /// Enforce best-first book ordering, re-sorting only when allowed.
    pub fn prepare_book(&mut self, sort_book: bool) -> Result<()> {
        match self.orderbook.check_ordering() {
            Ok(()) => Ok(()),
            Err(e) if sort_book => {
                warn!(market_id = %self.market_id, error = %e, "Re-sorting order book");
                self.orderbook.sort_best_first();
                Ok(())
            }
            Err(e) => Err(e).with_context(|| {
                format!(
                    "Market {}: order book rejected (use --sort-book to re-sort)",
                    self.market_id
                )
            }),
        }
    }

    pub fn view(&self) -> MarketView<'_> {
        let view = MarketView::new(self.market_id.as_str(), &self.orderbook, &self.trades)
            .with_history(&self.volume_history);
        match &self.stats {
            Some(stats) => view.with_stats(stats),
            None => view,
        }
    }
}

#[instrument(skip(path), fields(path = %path.display()))]
pub async fn load_input(path: &Path, sort_book: bool) -> Result<MarketInput> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read market input: {:?}", path))?;

    let mut input = MarketInput::from_json(&content)
        .with_context(|| format!("Invalid market input: {:?}", path))?;
    input.prepare_book(sort_book)?;

    debug!(
        market_id = %input.market_id,
        bids = input.orderbook.buys.len(),
        asks = input.orderbook.sells.len(),
        trades = input.trades.len(),
        "Market input loaded"
    );
    Ok(input)
}

/// Load several inputs concurrently; the first failure wins.
pub async fn load_inputs(paths: &[PathBuf], sort_book: bool) -> Result<Vec<MarketInput>> {
    try_join_all(paths.iter().map(|path| load_input(path, sort_book))).await
}
