//! Activity score: how often the market trades

use crate::calibration::ActivityParams;
use crate::stats::to_score;
use crate::types::Trade;
use chrono::{DateTime, Utc};
use tracing::trace;

/// Trades executed at or after `now - window`.
pub fn recent_trade_count(trades: &[Trade], now: DateTime<Utc>, window_ms: i64) -> usize {
    let cutoff = now.timestamp_millis() - window_ms;
    trades.iter().filter(|t| t.executed_at >= cutoff).count()
}

/// Score 0–100 on a saturating curve: `100·(1 - e^(-k·ln(1+n)))` where `n`
/// is the trade count in the trailing window.
pub fn activity_score(trades: &[Trade], now: DateTime<Utc>, params: &ActivityParams) -> u8 {
    if trades.is_empty() {
        return 0;
    }

    let count = recent_trade_count(trades, now, params.window_ms());
    let x = (count as f64).ln_1p();
    let raw = 100.0 * (1.0 - (-params.saturation * x).exp());
    let score = to_score(raw);
    trace!(recent_trades = count, score, "Activity scored");
    score
}
