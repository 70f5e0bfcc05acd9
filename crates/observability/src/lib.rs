//! Logging and metrics for MarketPulse
//!
//! ```ignore
//! use observability::{init_logging, EngineMetrics, LogFormat};
//!
//! init_logging("market-pulse", LogFormat::Json)?;
//! observability::init_metrics(9090)?;
//!
//! let metrics = EngineMetrics::new();
//! metrics.record_health(&result);
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, EngineMetrics, EvaluationTimer};
