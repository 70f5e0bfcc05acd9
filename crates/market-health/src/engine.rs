//! Entry point tying the scorers, the volatility analyzer and a clock together

use crate::calibration::{ScoringConfig, VolatilityConfig};
use crate::clock::{Clock, SystemClock};
use crate::error::MarketHealthError;
use crate::health::{HealthAggregator, HealthScoreResult};
use crate::report::{ComparisonEntry, MarketReport, MarketStats, OrderBookOverview, VolatilityPair};
use crate::types::{OrderBookSnapshot, Trade};
use crate::volatility::{VolatilityAnalyzer, VolatilityResult, VolatilityWindow};
use tracing::instrument;

/// Everything known about one market at evaluation time
#[derive(Debug, Clone, Copy)]
pub struct MarketView<'a> {
    pub market_id: &'a str,
    pub book: &'a OrderBookSnapshot,
    pub trades: &'a [Trade],
    pub volume_history: &'a [f64],
    pub stats: Option<&'a MarketStats>,
}

impl<'a> MarketView<'a> {
    pub fn new(market_id: &'a str, book: &'a OrderBookSnapshot, trades: &'a [Trade]) -> Self {
        Self {
            market_id,
            book,
            trades,
            volume_history: &[],
            stats: None,
        }
    }

    pub fn with_history(mut self, history: &'a [f64]) -> Self {
        self.volume_history = history;
        self
    }

    pub fn with_stats(mut self, stats: &'a MarketStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

#[derive(Debug, Clone)]
pub struct MarketHealthEngine<C: Clock = SystemClock> {
    health: HealthAggregator<C>,
    volatility: VolatilityAnalyzer,
    volatility_config: VolatilityConfig,
}

impl MarketHealthEngine<SystemClock> {
    pub fn new(scoring: ScoringConfig, volatility: VolatilityConfig) -> Self {
        Self::with_clock(scoring, volatility, SystemClock)
    }
}

impl Default for MarketHealthEngine<SystemClock> {
    fn default() -> Self {
        Self::new(ScoringConfig::default(), VolatilityConfig::default())
    }
}

impl<C: Clock> MarketHealthEngine<C> {
    pub fn with_clock(scoring: ScoringConfig, volatility: VolatilityConfig, clock: C) -> Self {
        Self {
            health: HealthAggregator::with_clock(scoring, clock),
            volatility: volatility.analyzer(),
            volatility_config: volatility,
        }
    }

    pub fn scoring_config(&self) -> &ScoringConfig {
        self.health.config()
    }

    pub fn volatility_config(&self) -> &VolatilityConfig {
        &self.volatility_config
    }

    pub fn health(&self, market: &MarketView<'_>) -> HealthScoreResult {
        self.health
            .evaluate_with_history(market.book, market.trades, market.volume_history)
    }

    /// Volatility for a caller-chosen window, subject to the window policy.
    pub fn volatility(
        &self,
        trades: &[Trade],
        window: VolatilityWindow,
    ) -> Result<VolatilityResult, MarketHealthError> {
        self.volatility_config.check_window(window)?;
        Ok(self.volatility.analyze(trades, window, self.health.clock().now()))
    }

    /// Health, 1h and 24h volatility and the top of book, all at one instant.
    #[instrument(skip_all, fields(market_id = market.market_id))]
    pub fn report(&self, market: &MarketView<'_>) -> MarketReport {
        let now = self.health.clock().now();
        let health = self
            .health
            .evaluate_at(market.book, market.trades, market.volume_history, now);
        let volatility = VolatilityPair {
            one_hour: self
                .volatility
                .analyze(market.trades, VolatilityWindow::ONE_HOUR, now),
            one_day: self
                .volatility
                .analyze(market.trades, VolatilityWindow::ONE_DAY, now),
        };

        MarketReport {
            market_id: market.market_id.to_string(),
            generated_at: now,
            health,
            volatility,
            orderbook: OrderBookOverview::from_book(market.book),
            stats: market.stats.filter(|s| !s.is_empty()).cloned(),
        }
    }

    pub fn comparison_entry(&self, market: &MarketView<'_>) -> ComparisonEntry {
        let now = self.health.clock().now();
        let health = self
            .health
            .evaluate_at(market.book, market.trades, market.volume_history, now);
        let volatility = self
            .volatility
            .analyze(market.trades, VolatilityWindow::ONE_HOUR, now);
        ComparisonEntry::new(market.market_id, &health, &volatility, market.book)
    }
}
