//! Prometheus metrics for scoring runs
//!
//! # Metrics
//!
//! * `health_evaluations_total{grade}` - health evaluations by resulting grade
//! * `health_score` - distribution of health scores
//! * `volatility_evaluations_total{window,interpretation}` - volatility runs
//! * `evaluation_duration_seconds{kind}` - wall time per evaluation
//! * `input_errors_total{reason}` - rejected market inputs

use market_health::{HealthScoreResult, VolatilityResult, VolatilityWindow};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Serve `/metrics` on `0.0.0.0:port`.
///
/// Needs a running Tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new().with_http_listener(addr).install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Recorder facade for the engine's outputs
///
/// Without an installed exporter every call is a no-op.
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    service: String,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every series with a `service` label.
    pub fn for_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    pub fn record_health(&self, result: &HealthScoreResult) {
        counter!(
            "health_evaluations_total",
            "service" => self.service.clone(),
            "grade" => result.grade.as_str()
        )
        .increment(1);
        histogram!("health_score", "service" => self.service.clone())
            .record(f64::from(result.health_score));
    }

    pub fn record_volatility(&self, window: VolatilityWindow, result: &VolatilityResult) {
        counter!(
            "volatility_evaluations_total",
            "service" => self.service.clone(),
            "window" => window.label(),
            "interpretation" => result.interpretation.as_str()
        )
        .increment(1);
    }

    pub fn record_input_error(&self, reason: &'static str) {
        counter!(
            "input_errors_total",
            "service" => self.service.clone(),
            "reason" => reason
        )
        .increment(1);
    }

    /// Start timing one evaluation; recorded when the guard drops.
    pub fn start_timer(&self, kind: &'static str) -> EvaluationTimer<'_> {
        EvaluationTimer {
            metrics: self,
            kind,
            start: Instant::now(),
        }
    }

    fn record_duration(&self, kind: &'static str, seconds: f64) {
        histogram!(
            "evaluation_duration_seconds",
            "service" => self.service.clone(),
            "kind" => kind
        )
        .record(seconds);
    }
}

/// Records `evaluation_duration_seconds` on drop
pub struct EvaluationTimer<'a> {
    metrics: &'a EngineMetrics,
    kind: &'static str,
    start: Instant,
}

impl Drop for EvaluationTimer<'_> {
    fn drop(&mut self) {
        self.metrics
            .record_duration(self.kind, self.start.elapsed().as_secs_f64());
    }
}
