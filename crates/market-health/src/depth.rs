//! Depth score: notional resting near the mid-price

use crate::calibration::DepthParams;
use crate::stats::to_score;
use crate::types::OrderBookSnapshot;
use tracing::trace;

/// Total notional of bids at or above `mid·(1-band)` plus asks at or below
/// `mid·(1+band)`. `None` for a one-sided book.
pub fn notional_in_band(book: &OrderBookSnapshot, band_pct: f64) -> Option<f64> {
    let mid = book.mid_price()?;
    let low = mid * (1.0 - band_pct);
    let high = mid * (1.0 + band_pct);

    let bids: f64 = book
        .buys
        .iter()
        .filter(|o| o.price() >= low)
        .map(|o| o.notional())
        .sum();
    let asks: f64 = book
        .sells
        .iter()
        .filter(|o| o.price() <= high)
        .map(|o| o.notional())
        .sum();

    Some(bids + asks)
}

/// Score 0–100: in-band notional relative to the reference notional.
pub fn depth_score(book: &OrderBookSnapshot, params: &DepthParams) -> u8 {
    let Some(total) = notional_in_band(book, params.band_pct) else {
        trace!("One-sided book, depth score 0");
        return 0;
    };

    let raw = total / params.reference_notional * 100.0;
    let score = to_score(raw);
    trace!(notional = total, score, "Depth scored");
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;
    use proptest::prelude::*;

    fn params() -> DepthParams {
        DepthParams::default()
    }

    #[test]
    fn test_empty_side_scores_zero() {
        let book = OrderBookSnapshot::new(vec![Order::new("100", "10")], vec![]);
        assert_eq!(depth_score(&book, &params()), 0);
        assert_eq!(depth_score(&OrderBookSnapshot::default(), &params()), 0);
    }

    #[test]
    fn test_half_reference_notional() {
        // 100·250 + 100·250 = 50 000 → 50
        let book = OrderBookSnapshot::new(
            vec![Order::new("100", "250")],
            vec![Order::new("100", "250")],
        );
        assert_eq!(depth_score(&book, &params()), 50);
    }

    #[test]
    fn test_out_of_band_levels_ignored() {
        // mid = 100, band [98, 102]
        let book = OrderBookSnapshot::new(
            vec![Order::new("99", "100"), Order::new("97", "100000")],
            vec![Order::new("101", "100"), Order::new("103", "100000")],
        );
        let total = notional_in_band(&book, 0.02).unwrap();
        assert!((total - 20_000.0).abs() < 1e-9);
        assert_eq!(depth_score(&book, &params()), 20);
    }

    #[test]
    fn test_band_edges_inclusive() {
        let book = OrderBookSnapshot::new(
            vec![Order::new("100", "1"), Order::new("50", "10")],
            vec![Order::new("100", "1"), Order::new("150", "1")],
        );
        // mid 100, ±50% band: both edges land exactly on a level
        let total = notional_in_band(&book, 0.5).unwrap();
        assert!((total - 850.0).abs() < 1e-9);
    }

    #[test]
    fn test_capped_at_100() {
        let book = OrderBookSnapshot::new(
            vec![Order::new("100", "5000")],
            vec![Order::new("100", "5000")],
        );
        assert_eq!(depth_score(&book, &params()), 100);
    }

    #[test]
    fn test_custom_reference() {
        let book = OrderBookSnapshot::new(
            vec![Order::new("100", "50")],
            vec![Order::new("100", "50")],
        );
        let p = DepthParams {
            reference_notional: 10_000.0,
            ..DepthParams::default()
        };
        assert_eq!(depth_score(&book, &p), 100);
    }

    proptest! {
        #[test]
        fn prop_adding_in_band_order_never_lowers_score(
            qty in 0.0f64..5_000.0,
            extra in 0.0f64..5_000.0,
            offset in 0.0f64..1.9,
        ) {
            let base = OrderBookSnapshot::new(
                vec![Order::new("100", qty.to_string())],
                vec![Order::new("101", qty.to_string())],
            );
            let mut richer = base.clone();
            // mid stays 100.5; band low ≈ 98.49
            richer.buys.push(Order::new((100.0 - offset).to_string(), extra.to_string()));

            prop_assert!(depth_score(&richer, &params()) >= depth_score(&base, &params()));
        }
    }
}
