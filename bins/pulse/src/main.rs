//! MarketPulse command-line binary
//!
//! Scores market input files, compares markets, and watches a file on an
//! interval with Prometheus metrics.

mod input;
mod watch;

use anyhow::{Context, Result};
use cli::{Cli, Commands, EvalOptions, OutputStyle};
use config::{generate_default_config, load_config, load_or_default, save_config, validate_config, PulseConfig};
use market_health::{compare_markets, MarketHealthEngine, VolatilityWindow};
use observability::{init_logging, init_metrics, EngineMetrics, LogFormat};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use watch::{ctrl_c_token, run_watch, WatchSettings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = match eval_options(&cli.command) {
        Some(opts) => load_or_default(opts.config.as_deref())?,
        None => PulseConfig::default(),
    };

    let format = match cli.log_format {
        Some(arg) => LogFormat::parse(arg.as_str()).unwrap_or_default(),
        None => LogFormat::parse(&config.service.log_format).unwrap_or_default(),
    };
    init_logging(&config.service.name, format)?;
    debug!(?cli, "CLI arguments parsed");

    match cli.command {
        Commands::Health { input, opts } => health_command(&config, &input, &opts).await,
        Commands::Volatility {
            input,
            window,
            opts,
        } => volatility_command(&config, &input, window.as_deref(), &opts).await,
        Commands::Summary { input, opts } => summary_command(&config, &input, &opts).await,
        Commands::Compare { inputs, opts } => compare_command(&config, &inputs, &opts).await,
        Commands::Watch {
            input,
            interval,
            opts,
        } => watch_command(&config, input, interval, &opts).await,
        Commands::Validate { config } => {
            info!("Executing 'validate' command");
            validate_command(config).await
        }
        Commands::Init { output } => {
            info!("Executing 'init' command");
            init_command(output).await
        }
    }
}

fn eval_options(command: &Commands) -> Option<&EvalOptions> {
    match command {
        Commands::Health { opts, .. }
        | Commands::Volatility { opts, .. }
        | Commands::Summary { opts, .. }
        | Commands::Compare { opts, .. }
        | Commands::Watch { opts, .. } => Some(opts),
        Commands::Validate { .. } | Commands::Init { .. } => None,
    }
}

/// Validate the loaded configuration and build an engine from it.
fn build_engine(config: &PulseConfig) -> Result<MarketHealthEngine> {
    let report = validate_config(config);

    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot evaluate markets due to configuration errors");
    }

    Ok(MarketHealthEngine::new(
        config.scoring.clone(),
        config.volatility.clone(),
    ))
}

fn print_json<T: Serialize>(value: &T, style: OutputStyle) -> Result<()> {
    let json = match style {
        OutputStyle::Pretty => serde_json::to_string_pretty(value)?,
        OutputStyle::Compact => serde_json::to_string(value)?,
    };
    println!("{}", json);
    Ok(())
}

async fn health_command(config: &PulseConfig, path: &Path, opts: &EvalOptions) -> Result<()> {
    let engine = build_engine(config)?;
    let metrics = EngineMetrics::for_service(&config.service.name);
    let input = input::load_input(path, opts.sort_book).await?;

    let result = {
        let _timer = metrics.start_timer("health");
        engine.health(&input.view())
    };
    metrics.record_health(&result);

    info!(
        market_id = %input.market_id,
        health_score = result.health_score,
        grade = %result.grade,
        "Health scored"
    );
    print_json(&result, opts.output)
}

async fn volatility_command(
    config: &PulseConfig,
    path: &Path,
    window: Option<&str>,
    opts: &EvalOptions,
) -> Result<()> {
    let engine = build_engine(config)?;
    let metrics = EngineMetrics::for_service(&config.service.name);

    let window = match window {
        Some(raw) => VolatilityWindow::parse(raw)?,
        None => config.volatility.default_window(),
    };
    let input = input::load_input(path, opts.sort_book).await?;

    let result = {
        let _timer = metrics.start_timer("volatility");
        engine.volatility(&input.trades, window)
    };
    let result = match result {
        Ok(result) => result,
        Err(e) => {
            metrics.record_input_error("window");
            return Err(e).context("Volatility window rejected");
        }
    };
    metrics.record_volatility(window, &result);

    info!(
        market_id = %input.market_id,
        window = %window,
        volatility_pct = result.volatility_pct,
        interpretation = %result.interpretation,
        "Volatility computed"
    );
    print_json(&result, opts.output)
}

async fn summary_command(config: &PulseConfig, path: &Path, opts: &EvalOptions) -> Result<()> {
    let engine = build_engine(config)?;
    let metrics = EngineMetrics::for_service(&config.service.name);
    let input = input::load_input(path, opts.sort_book).await?;

    let report = {
        let _timer = metrics.start_timer("report");
        engine.report(&input.view())
    };
    metrics.record_health(&report.health);

    print_json(&report, opts.output)
}

async fn compare_command(config: &PulseConfig, paths: &[PathBuf], opts: &EvalOptions) -> Result<()> {
    let engine = build_engine(config)?;
    let inputs = input::load_inputs(paths, opts.sort_book).await?;

    let entries = inputs
        .iter()
        .map(|input| engine.comparison_entry(&input.view()))
        .collect();
    let comparison = compare_markets(entries)?;

    info!(
        markets = comparison.ranking.len(),
        best_market = %comparison.best_market,
        "Markets compared"
    );
    print_json(&comparison, opts.output)
}

async fn watch_command(
    config: &PulseConfig,
    input: PathBuf,
    interval: Option<u64>,
    opts: &EvalOptions,
) -> Result<()> {
    let engine = build_engine(config)?;

    let seconds = interval.unwrap_or(config.watch.interval_seconds);
    if seconds == 0 {
        anyhow::bail!("Watch interval must be at least one second");
    }

    if config.metrics.enabled {
        init_metrics(config.metrics.port)?;
    }
    let metrics = EngineMetrics::for_service(&config.service.name);

    let settings = WatchSettings {
        input,
        interval: Duration::from_secs(seconds),
        sort_book: opts.sort_book,
    };
    run_watch(&engine, &metrics, &settings, ctrl_c_token()).await?;
    Ok(())
}

async fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {}", config.service.name);
    println!(
        "Calibration: {}",
        if config.scoring.is_published_calibration() {
            "published defaults"
        } else {
            "custom"
        }
    );
    let windows: Vec<String> = config
        .volatility
        .allowed_windows
        .iter()
        .map(|w| format!("{}h", w))
        .collect();
    println!("Volatility windows: {}", windows.join(", "));
    println!(
        "Metrics: {}",
        if config.metrics.enabled {
            format!("enabled on port {}", config.metrics.port)
        } else {
            "disabled".to_string()
        }
    );

    Ok(())
}

async fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    if output_path.exists() {
        anyhow::bail!(
            "Refusing to overwrite existing file: {}",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let config = generate_default_config();
    save_config(&config, output_path)?;

    println!("Configuration written to {}", output_path.display());
    println!("Edit it, then check it with: pulse validate --config {}", output_path.display());
    Ok(())
}
