//! Spread score: cost of crossing the book

use crate::calibration::SpreadParams;
use crate::stats::to_score;
use crate::types::OrderBookSnapshot;
use tracing::trace;

/// Best bid/ask gap as a percentage of mid-price.
///
/// `None` when a side is empty or a best price is not positive.
pub fn spread_pct(book: &OrderBookSnapshot) -> Option<f64> {
    let bid = book.best_bid()?;
    let ask = book.best_ask()?;
    if bid <= 0.0 || ask <= 0.0 {
        return None;
    }
    let mid = (bid + ask) / 2.0;
    Some((ask - bid) / mid * 100.0)
}

/// Score 0–100: `100·e^(-decay·spread%)`. Zero spread scores 100.
pub fn spread_score(book: &OrderBookSnapshot, params: &SpreadParams) -> u8 {
    let Some(pct) = spread_pct(book) else {
        trace!("No usable best bid/ask, spread score 0");
        return 0;
    };

    let raw = 100.0 * (-params.decay * pct).exp();
    let score = to_score(raw);
    trace!(spread_pct = pct, score, "Spread scored");
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;

    fn book(bid: &str, ask: &str) -> OrderBookSnapshot {
        OrderBookSnapshot::new(vec![Order::new(bid, "1")], vec![Order::new(ask, "1")])
    }

    #[test]
    fn test_empty_side_scores_zero() {
        let params = SpreadParams::default();
        let no_bids = OrderBookSnapshot::new(vec![], vec![Order::new("101", "1")]);
        let no_asks = OrderBookSnapshot::new(vec![Order::new("99", "1")], vec![]);

        assert_eq!(spread_score(&no_bids, &params), 0);
        assert_eq!(spread_score(&no_asks, &params), 0);
    }

    #[test]
    fn test_zero_spread_scores_full() {
        assert_eq!(spread_score(&book("100", "100"), &SpreadParams::default()), 100);
    }

    #[test]
    fn test_non_positive_price_scores_zero() {
        let params = SpreadParams::default();
        assert_eq!(spread_score(&book("0", "100"), &params), 0);
        assert_eq!(spread_score(&book("100", "-1"), &params), 0);
    }

    #[test]
    fn test_one_percent_spread() {
        // mid 100.5, spread ≈ 0.995% → 100·e^(-2.4876) ≈ 8.31
        assert_eq!(spread_score(&book("100", "101"), &SpreadParams::default()), 8);
    }

    #[test]
    fn test_tight_spread() {
        // 0.01% spread → 100·e^(-0.025) ≈ 97.5
        let score = spread_score(&book("9999.5", "10000.5"), &SpreadParams::default());
        assert_eq!(score, 98);
    }

    #[test]
    fn test_unparseable_price_degrades_to_zero() {
        assert_eq!(spread_score(&book("n/a", "100"), &SpreadParams::default()), 0);
    }

    #[test]
    fn test_spread_pct() {
        let pct = spread_pct(&book("99", "101")).unwrap();
        assert!((pct - 2.0).abs() < 1e-12);
        assert_eq!(spread_pct(&OrderBookSnapshot::default()), None);
    }
}
