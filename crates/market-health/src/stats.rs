//! Small numeric helpers shared by the scorers

use ordered_float::OrderedFloat;

/// Round half up: 67.5 becomes 68.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Round to a fixed number of decimal places.
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

/// Convert a raw score to the 0–100 integer scale.
///
/// Non-finite input (from unparseable prices or quantities) maps to 0.
pub fn to_score(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    round_half_up(raw.clamp(0.0, 100.0)) as u8
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation; 1 when the mean is not positive.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m > 0.0 {
        std_dev(values) / m
    } else {
        1.0
    }
}

/// Linear-interpolated percentile, `p` in [0, 1].
///
/// Sorts ascending, takes position `(n - 1) * p` and interpolates between the
/// neighbouring ranks. Empty input yields 0.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort();

    let pos = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let base = pos.floor() as usize;
    let rest = pos - base as f64;

    match sorted.get(base + 1) {
        Some(next) => sorted[base].0 + rest * (next.0 - sorted[base].0),
        None => sorted[base].0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(67.5), 68.0);
        assert_eq!(round_half_up(67.49), 67.0);
        assert_eq!(round_half_up(0.5), 1.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.653_04, 4), 1.653);
        assert_eq!(round_to(48.919_9, 2), 48.92);
    }

    #[test]
    fn test_to_score_clamps_and_handles_nan() {
        assert_eq!(to_score(f64::NAN), 0);
        assert_eq!(to_score(f64::INFINITY), 0);
        assert_eq!(to_score(-4.0), 0);
        assert_eq!(to_score(250.0), 100);
        assert_eq!(to_score(59.5), 60);
    }

    #[test]
    fn test_percentile_median() {
        assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.5), 3.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        assert!((percentile(&[1.0, 2.0, 3.0, 4.0], 0.25) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_unsorted_input() {
        assert_eq!(percentile(&[5.0, 1.0, 4.0, 2.0, 3.0], 0.5), 3.0);
    }

    #[test]
    fn test_percentile_edges() {
        assert_eq!(percentile(&[], 0.1), 0.0);
        assert_eq!(percentile(&[7.0], 0.9), 7.0);
        assert_eq!(percentile(&[1.0, 9.0], 1.0), 9.0);
    }

    #[test]
    fn test_population_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(std_dev(&values), 2.0);
    }

    #[test]
    fn test_cv_non_positive_mean() {
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), 1.0);
        assert_eq!(coefficient_of_variation(&[3.0, 3.0]), 0.0);
    }
}
