//! MarketPulse configuration
//!
//! One YAML file drives the scoring calibration, the volatility window
//! policy, logging, metrics export and the watch loop. Every section is
//! optional and falls back to the published defaults.

pub use market_health::{ScoringConfig, VolatilityConfig};
use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    /// One of `pretty`, `json`, `compact`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WatchConfig {
    #[serde(default = "default_watch_interval_seconds")]
    pub interval_seconds: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_watch_interval_seconds(),
        }
    }
}

/// Root of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PulseConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub volatility: VolatilityConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}
