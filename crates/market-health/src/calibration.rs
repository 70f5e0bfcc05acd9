//! Calibration constants for the scorers
//!
//! The defaults are the published calibration; changing them makes scores
//! incomparable with earlier output.

use crate::error::MarketHealthError;
use crate::volatility::{VolatilityAnalyzer, VolatilityWindow, HOURS_PER_YEAR};
use serde::{Deserialize, Serialize};

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadParams {
    /// Exponential decay per percentage point of spread
    pub decay: f64,
}

impl Default for SpreadParams {
    fn default() -> Self {
        Self { decay: 2.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthParams {
    /// Half-width of the band around mid, as a fraction (0.02 = ±2%)
    pub band_pct: f64,
    /// Notional that earns a full score
    pub reference_notional: f64,
}

impl Default for DepthParams {
    fn default() -> Self {
        Self {
            band_pct: 0.02,
            reference_notional: 100_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityParams {
    pub window_minutes: u32,
    /// Saturation rate of the `1 - e^(-k·ln(1+n))` curve
    pub saturation: f64,
}

impl ActivityParams {
    pub fn window_ms(&self) -> i64 {
        i64::from(self.window_minutes) * MINUTE_MS
    }
}

impl Default for ActivityParams {
    fn default() -> Self {
        Self {
            window_minutes: 60,
            saturation: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityParams {
    /// Fewer trades than this returns `insufficient_trades`
    pub min_trades: usize,
    pub window_minutes: u32,
    pub bucket_minutes: u32,
    /// History must have strictly more samples than this to be consulted
    pub history_min_samples: usize,
    pub history_percentile: f64,
    /// Exponential decay per unit of coefficient of variation
    pub decay: f64,
    pub insufficient_trades: u8,
    pub no_volume: u8,
    pub single_bucket: u8,
}

impl StabilityParams {
    pub fn window_ms(&self) -> i64 {
        i64::from(self.window_minutes) * MINUTE_MS
    }

    pub fn bucket_ms(&self) -> i64 {
        i64::from(self.bucket_minutes) * MINUTE_MS
    }
}

impl Default for StabilityParams {
    fn default() -> Self {
        Self {
            min_trades: 10,
            window_minutes: 60,
            bucket_minutes: 10,
            history_min_samples: 20,
            history_percentile: 0.1,
            decay: 1.5,
            insufficient_trades: 30,
            no_volume: 10,
            single_bucket: 40,
        }
    }
}

/// Component weights of the health score. Expected to sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthWeights {
    pub spread: f64,
    pub depth: f64,
    pub activity: f64,
    pub stability: f64,
}

impl HealthWeights {
    pub fn total(&self) -> f64 {
        self.spread + self.depth + self.activity + self.stability
    }
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            spread: 0.30,
            depth: 0.30,
            activity: 0.25,
            stability: 0.15,
        }
    }
}

/// Everything the health aggregator needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub spread: SpreadParams,
    pub depth: DepthParams,
    pub activity: ActivityParams,
    pub stability: StabilityParams,
    pub weights: HealthWeights,
}

impl ScoringConfig {
    /// True when every constant matches the published calibration.
    pub fn is_published_calibration(&self) -> bool {
        *self == Self::default()
    }
}

/// Volatility window policy and annualisation basis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityConfig {
    pub default_window_hours: f64,
    pub max_window_hours: f64,
    /// Windows callers may request; empty allows anything up to the max
    pub allowed_windows: Vec<f64>,
    pub hours_per_year: f64,
    /// Sort in-window trades by execution time before taking returns
    pub sort_chronologically: bool,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            default_window_hours: 1.0,
            max_window_hours: 24.0,
            allowed_windows: vec![1.0, 4.0, 12.0, 24.0],
            hours_per_year: HOURS_PER_YEAR,
            sort_chronologically: false,
        }
    }
}

impl VolatilityConfig {
    pub fn default_window(&self) -> VolatilityWindow {
        VolatilityWindow::hours(self.default_window_hours).unwrap_or_default()
    }

    /// Check a requested window against the policy.
    pub fn check_window(&self, window: VolatilityWindow) -> Result<(), MarketHealthError> {
        let hours = window.as_hours();
        if hours > self.max_window_hours {
            return Err(MarketHealthError::WindowNotAllowed {
                window: window.label(),
                reason: format!("maximum window is {}h", self.max_window_hours),
            });
        }

        let listed = self.allowed_windows.is_empty()
            || self.allowed_windows.iter().any(|w| (w - hours).abs() < 1e-9);
        if !listed {
            let allowed: Vec<String> = self.allowed_windows.iter().map(|w| format!("{}h", w)).collect();
            return Err(MarketHealthError::WindowNotAllowed {
                window: window.label(),
                reason: format!("must be one of: {}", allowed.join(", ")),
            });
        }

        Ok(())
    }

    pub fn analyzer(&self) -> VolatilityAnalyzer {
        VolatilityAnalyzer::new()
            .with_hours_per_year(self.hours_per_year)
            .sort_chronologically(self.sort_chronologically)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = HealthWeights::default();
        assert!((weights.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_conversions() {
        let stability = StabilityParams::default();
        assert_eq!(stability.window_ms(), HOUR_MS);
        assert_eq!(stability.bucket_ms(), 10 * MINUTE_MS);
        assert_eq!(ActivityParams::default().window_ms(), HOUR_MS);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let json = r#"{"depth": {"reference_notional": 50000.0}}"#;
        let config: ScoringConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.depth.reference_notional, 50_000.0);
        assert_eq!(config.depth.band_pct, 0.02);
        assert_eq!(config.spread.decay, 2.5);
        assert!(!config.is_published_calibration());
        assert!(ScoringConfig::default().is_published_calibration());
    }

    #[test]
    fn test_volatility_window_policy() {
        let config = VolatilityConfig::default();
        assert!(config.check_window(VolatilityWindow::parse("4h").unwrap()).is_ok());
        assert!(config.check_window(VolatilityWindow::ONE_DAY).is_ok());

        assert_matches!(
            config.check_window(VolatilityWindow::parse("48h").unwrap()),
            Err(MarketHealthError::WindowNotAllowed { .. })
        );
        assert_matches!(
            config.check_window(VolatilityWindow::parse("2h").unwrap()),
            Err(MarketHealthError::WindowNotAllowed { .. })
        );
    }

    #[test]
    fn test_open_window_list() {
        let config = VolatilityConfig {
            allowed_windows: vec![],
            ..VolatilityConfig::default()
        };
        assert!(config.check_window(VolatilityWindow::parse("2h").unwrap()).is_ok());
        assert_eq!(config.default_window(), VolatilityWindow::ONE_HOUR);
    }
}
