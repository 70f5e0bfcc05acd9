//! Stability score: how evenly volume arrives across short buckets
//!
//! Checks run in order and the first match wins:
//! 1. too few trades overall → `insufficient_trades`
//! 2. no volume in the trailing window → `no_volume`
//! 3. window volume below the historical low percentile → `no_volume`
//! 4. a single active bucket → `single_bucket`
//! 5. otherwise `100·e^(-decay·cv)` over bucket log-volumes

use crate::calibration::StabilityParams;
use crate::stats::{coefficient_of_variation, percentile, to_score};
use crate::types::Trade;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Per-bucket `Σ ln(1 + notional)` for trades in the trailing window.
///
/// Buckets are aligned to the epoch (`executed_at / bucket_ms`), ordered by
/// bucket start. A non-positive `bucket_ms` yields no buckets.
pub fn bucket_log_volumes(
    trades: &[Trade],
    now: DateTime<Utc>,
    window_ms: i64,
    bucket_ms: i64,
) -> Vec<f64> {
    if bucket_ms <= 0 {
        return Vec::new();
    }

    let cutoff = now.timestamp_millis() - window_ms;
    let mut buckets: BTreeMap<i64, f64> = BTreeMap::new();

    for trade in trades.iter().filter(|t| t.executed_at >= cutoff) {
        let bucket = trade.executed_at.div_euclid(bucket_ms);
        *buckets.entry(bucket).or_insert(0.0) += trade.notional().ln_1p();
    }

    buckets.into_values().collect()
}

/// Score 0–100 without a historical baseline.
pub fn stability_score(trades: &[Trade], now: DateTime<Utc>, params: &StabilityParams) -> u8 {
    stability_score_with_history(trades, &[], now, params)
}

/// Score 0–100, consulting `history` (this market's per-period log-volumes)
/// for a collapse check once it holds enough samples.
pub fn stability_score_with_history(
    trades: &[Trade],
    history: &[f64],
    now: DateTime<Utc>,
    params: &StabilityParams,
) -> u8 {
    if trades.len() < params.min_trades {
        trace!(trades = trades.len(), "Too few trades for stability");
        return sentinel(params.insufficient_trades);
    }

    let volumes = bucket_log_volumes(trades, now, params.window_ms(), params.bucket_ms());
    if volumes.is_empty() {
        trace!("No volume in stability window");
        return sentinel(params.no_volume);
    }

    if history.len() > params.history_min_samples {
        let threshold = percentile(history, params.history_percentile);
        let total: f64 = volumes.iter().sum();
        if total < threshold {
            debug!(total, threshold, "Window volume collapsed below history");
            return sentinel(params.no_volume);
        }
    }

    if volumes.len() < 2 {
        return sentinel(params.single_bucket);
    }

    let cv = coefficient_of_variation(&volumes);
    let raw = 100.0 * (-params.decay * cv).exp();
    let score = to_score(raw);
    trace!(buckets = volumes.len(), cv, score, "Stability scored");
    score
}

/// Configured fallback scores share the 0–100 range of computed ones.
fn sentinel(value: u8) -> u8 {
    value.min(100)
}
