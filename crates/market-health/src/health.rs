//! Weighted health score, letter grade and recommendation

use crate::activity::activity_score;
use crate::calibration::{HealthWeights, ScoringConfig};
use crate::clock::{Clock, SystemClock};
use crate::depth::depth_score;
use crate::spread::spread_score;
use crate::stability::stability_score_with_history;
use crate::stats::to_score;
use crate::types::{OrderBookSnapshot, Trade};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// Letter grade, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::AMinus,
            70..=79 => Grade::BPlus,
            60..=69 => Grade::B,
            50..=59 => Grade::C,
            _ => Grade::D,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Grade::A => "Excellent",
            Grade::AMinus => "Healthy",
            Grade::BPlus => "Good",
            Grade::B => "Moderate",
            Grade::C => "Poor",
            Grade::D => "Avoid",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            Grade::A => {
                "Highly liquid. Suitable for all trading strategies including high-frequency bots."
            }
            Grade::AMinus => "Good liquidity. Suitable for most trading strategies.",
            Grade::BPlus => {
                "Moderate liquidity. Suitable for regular trading with reasonable order sizes."
            }
            Grade::B => "Below average liquidity. Use caution with large orders.",
            Grade::C => "Low liquidity. High slippage risk. Not recommended for bots.",
            Grade::D => "Very low liquidity. Avoid unless necessary.",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sub-score and the weight it carries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub score: u8,
    pub weight: f64,
}

impl ComponentScore {
    pub fn weighted(&self) -> f64 {
        f64::from(self.score) * self.weight
    }

    /// Weight as a whole percentage, e.g. `"30%"`
    pub fn weight_label(&self) -> String {
        format!("{}%", (self.weight * 100.0).round())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub spread: ComponentScore,
    pub depth: ComponentScore,
    pub activity: ComponentScore,
    pub stability: ComponentScore,
}

impl ScoreBreakdown {
    pub fn new(spread: u8, depth: u8, activity: u8, stability: u8, weights: &HealthWeights) -> Self {
        Self {
            spread: ComponentScore { score: spread, weight: weights.spread },
            depth: ComponentScore { score: depth, weight: weights.depth },
            activity: ComponentScore { score: activity, weight: weights.activity },
            stability: ComponentScore { score: stability, weight: weights.stability },
        }
    }

    pub fn weighted_sum(&self) -> f64 {
        self.spread.weighted()
            + self.depth.weighted()
            + self.activity.weighted()
            + self.stability.weighted()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScoreResult {
    pub health_score: u8,
    pub grade: Grade,
    pub status: String,
    pub recommendation: String,
    pub components: ScoreBreakdown,
}

impl HealthScoreResult {
    pub fn from_breakdown(components: ScoreBreakdown) -> Self {
        let health_score = to_score(components.weighted_sum());
        let grade = Grade::from_score(health_score);
        Self {
            health_score,
            grade,
            status: grade.status().to_string(),
            recommendation: grade.recommendation().to_string(),
            components,
        }
    }
}

/// Runs the four scorers and combines them.
///
/// The clock is read once per evaluation so every component sees the same
/// instant.
#[derive(Debug, Clone)]
pub struct HealthAggregator<C: Clock = SystemClock> {
    config: ScoringConfig,
    clock: C,
}

impl HealthAggregator<SystemClock> {
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for HealthAggregator<SystemClock> {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl<C: Clock> HealthAggregator<C> {
    pub fn with_clock(config: ScoringConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn evaluate(&self, book: &OrderBookSnapshot, trades: &[Trade]) -> HealthScoreResult {
        self.evaluate_at(book, trades, &[], self.clock.now())
    }

    pub fn evaluate_with_history(
        &self,
        book: &OrderBookSnapshot,
        trades: &[Trade],
        history: &[f64],
    ) -> HealthScoreResult {
        self.evaluate_at(book, trades, history, self.clock.now())
    }

    #[instrument(skip_all, fields(bids = book.buys.len(), asks = book.sells.len(), trades = trades.len()))]
    pub fn evaluate_at(
        &self,
        book: &OrderBookSnapshot,
        trades: &[Trade],
        history: &[f64],
        now: DateTime<Utc>,
    ) -> HealthScoreResult {
        let cfg = &self.config;
        let components = ScoreBreakdown::new(
            spread_score(book, &cfg.spread),
            depth_score(book, &cfg.depth),
            activity_score(trades, now, &cfg.activity),
            stability_score_with_history(trades, history, now, &cfg.stability),
            &cfg.weights,
        );

        let result = HealthScoreResult::from_breakdown(components);
        debug!(
            health_score = result.health_score,
            grade = %result.grade,
            spread = components.spread.score,
            depth = components.depth.score,
            activity = components.activity.score,
            stability = components.stability.score,
            "Health evaluated"
        );
        result
    }
}
