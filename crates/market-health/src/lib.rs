//! Liquidity health scoring for MarketPulse
//!
//! Turns an order book snapshot and a trade tape into a 0-100 health score,
//! a letter grade and a recommendation, plus trailing-window volatility.
//!
//! # Core Components
//!
//! - [`spread`] - Bid/ask spread tightness
//! - [`depth`] - Resting notional near the mid price
//! - [`activity`] - Trade frequency over the trailing hour
//! - [`stability`] - Evenness of traded volume across time buckets
//! - [`health`] - Weighted aggregation, grades and recommendations
//! - [`volatility`] - Realised volatility over a trailing window
//! - [`report`] - Per-market report and multi-market comparison
//! - [`engine`] - Clock-driven entry point over all of the above
//!
//! # Key Invariants
//!
//! - Every score is an integer in `[0, 100]`, including on malformed input
//! - Scoring is pure: same inputs and same instant give the same result
//! - Books are assumed best-first; check at the boundary with
//!   [`OrderBookSnapshot::check_ordering`]
//! - Only the engine reads the clock, once per evaluation

pub mod activity;
pub mod calibration;
pub mod clock;
pub mod depth;
pub mod engine;
pub mod error;
pub mod health;
pub mod report;
pub mod spread;
pub mod stability;
pub mod stats;
pub mod types;
pub mod volatility;

pub use calibration::{ScoringConfig, VolatilityConfig};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{MarketHealthEngine, MarketView};
pub use error::MarketHealthError;
pub use health::{Grade, HealthAggregator, HealthScoreResult, ScoreBreakdown};
pub use report::{compare_markets, Comparison, ComparisonEntry, MarketReport, MarketStats};
pub use types::{BookSide, MarketId, Order, OrderBookSnapshot, Trade};
pub use volatility::{Interpretation, VolatilityAnalyzer, VolatilityResult, VolatilityWindow};

pub type Result<T> = std::result::Result<T, MarketHealthError>;
