//! Periodic re-evaluation of one market input file

use crate::input::load_input;
use anyhow::Result;
use market_health::{Clock, MarketHealthEngine, MarketReport, VolatilityWindow};
use observability::EngineMetrics;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub input: PathBuf,
    pub interval: Duration,
    pub sort_book: bool,
}

/// A token cancelled on Ctrl+C
pub fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, stopping");
                trigger.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    token
}

/// Load, score and record one market.
pub async fn evaluate_once<C: Clock>(
    engine: &MarketHealthEngine<C>,
    metrics: &EngineMetrics,
    settings: &WatchSettings,
) -> Result<MarketReport> {
    let input = match load_input(&settings.input, settings.sort_book).await {
        Ok(input) => input,
        Err(e) => {
            metrics.record_input_error("load");
            return Err(e);
        }
    };

    let report = {
        let _timer = metrics.start_timer("report");
        engine.report(&input.view())
    };

    metrics.record_health(&report.health);
    metrics.record_volatility(VolatilityWindow::ONE_HOUR, &report.volatility.one_hour);
    metrics.record_volatility(VolatilityWindow::ONE_DAY, &report.volatility.one_day);
    Ok(report)
}

/// Evaluate on every tick until `shutdown` is cancelled.
///
/// Failed ticks are logged and skipped. Returns the number of successful
/// evaluations.
pub async fn run_watch<C: Clock>(
    engine: &MarketHealthEngine<C>,
    metrics: &EngineMetrics,
    settings: &WatchSettings,
    shutdown: CancellationToken,
) -> Result<u64> {
    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut evaluations = 0u64;

    info!(
        input = %settings.input.display(),
        interval_ms = settings.interval.as_millis() as u64,
        "Watch started"
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                match evaluate_once(engine, metrics, settings).await {
                    Ok(report) => {
                        evaluations += 1;
                        info!(
                            market_id = %report.market_id,
                            health_score = report.health.health_score,
                            grade = %report.health.grade,
                            volatility_1h = report.volatility.one_hour.volatility_pct,
                            "Market evaluated"
                        );
                        println!("{}", serde_json::to_string(&report)?);
                    }
                    Err(e) => warn!(error = %format!("{:#}", e), "Evaluation skipped"),
                }
            }
        }
    }

    info!(evaluations, "Watch stopped");
    Ok(evaluations)
}
