use crate::*;
use market_health::calibration::{HealthWeights, StabilityParams};
use thiserror::Error;

const WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Health weights must sum to 1.0, got {0}")]
    WeightsDoNotSumToOne(f64),

    #[error("{field} must not be negative")]
    NegativeWeight { field: String },

    #[error("{field} must be a positive number")]
    InvalidPositiveFloat { field: String },

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("{field} must be between 0 and 1")]
    InvalidFraction { field: String },

    #[error("{field} must be a score between 0 and 100, got {value}")]
    InvalidScore { field: String, value: u8 },

    #[error("Stability bucket ({bucket}m) is longer than its window ({window}m)")]
    BucketLargerThanWindow { bucket: u32, window: u32 },

    #[error("Allowed volatility window {window}h exceeds the maximum of {max}h")]
    WindowAboveMax { window: f64, max: f64 },

    #[error("Default volatility window {0}h is not in the allowed list")]
    DefaultWindowNotAllowed(f64),

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Service name is required")]
    MissingServiceName,
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

pub fn validate_config(config: &PulseConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_service(&config.service, &mut report);
    validate_scoring(&config.scoring, &mut report);
    validate_volatility(&config.volatility, &mut report);

    if config.watch.interval_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "watch.interval_seconds".to_string(),
        });
    }

    if config.metrics.enabled && config.metrics.port == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "metrics.port".to_string(),
        });
    }

    report
}

fn validate_service(service: &ServiceConfig, report: &mut ValidationReport) {
    if service.name.trim().is_empty() {
        report.add_error(ValidationError::MissingServiceName);
    }

    if !LOG_FORMATS.contains(&service.log_format.as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(service.log_format.clone()));
    }

    for (field, value) in [
        ("service.name", &service.name),
        ("service.log_format", &service.log_format),
    ] {
        let unresolved = unresolved_env_vars(value).unwrap_or_default();
        if !unresolved.is_empty() {
            report.add_warning(
                field,
                &format!("Unresolved environment variables: {}", unresolved.join(", ")),
            );
        }
    }
}

fn validate_scoring(scoring: &ScoringConfig, report: &mut ValidationReport) {
    require_positive("scoring.spread.decay", scoring.spread.decay, report);
    require_positive("scoring.depth.band_pct", scoring.depth.band_pct, report);
    require_positive(
        "scoring.depth.reference_notional",
        scoring.depth.reference_notional,
        report,
    );
    require_positive("scoring.activity.saturation", scoring.activity.saturation, report);

    if scoring.activity.window_minutes == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "scoring.activity.window_minutes".to_string(),
        });
    }

    validate_stability(&scoring.stability, report);
    validate_weights(&scoring.weights, report);

    if !scoring.is_published_calibration() {
        report.add_warning(
            "scoring",
            "Calibration differs from the published defaults; scores are not comparable with other deployments",
        );
    }
}

fn validate_stability(stability: &StabilityParams, report: &mut ValidationReport) {
    if stability.window_minutes == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "scoring.stability.window_minutes".to_string(),
        });
    }

    if stability.bucket_minutes == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "scoring.stability.bucket_minutes".to_string(),
        });
    } else if stability.bucket_minutes > stability.window_minutes {
        report.add_error(ValidationError::BucketLargerThanWindow {
            bucket: stability.bucket_minutes,
            window: stability.window_minutes,
        });
    }

    require_positive("scoring.stability.decay", stability.decay, report);

    if !(0.0..=1.0).contains(&stability.history_percentile) {
        report.add_error(ValidationError::InvalidFraction {
            field: "scoring.stability.history_percentile".to_string(),
        });
    }

    for (field, value) in [
        ("scoring.stability.insufficient_trades", stability.insufficient_trades),
        ("scoring.stability.no_volume", stability.no_volume),
        ("scoring.stability.single_bucket", stability.single_bucket),
    ] {
        if value > 100 {
            report.add_error(ValidationError::InvalidScore {
                field: field.to_string(),
                value,
            });
        }
    }
}

fn validate_weights(weights: &HealthWeights, report: &mut ValidationReport) {
    for (field, value) in [
        ("scoring.weights.spread", weights.spread),
        ("scoring.weights.depth", weights.depth),
        ("scoring.weights.activity", weights.activity),
        ("scoring.weights.stability", weights.stability),
    ] {
        if value < 0.0 {
            report.add_error(ValidationError::NegativeWeight {
                field: field.to_string(),
            });
        }
    }

    let total = weights.total();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        report.add_error(ValidationError::WeightsDoNotSumToOne(total));
    }
}

fn validate_volatility(volatility: &VolatilityConfig, report: &mut ValidationReport) {
    require_positive("volatility.max_window_hours", volatility.max_window_hours, report);
    require_positive(
        "volatility.default_window_hours",
        volatility.default_window_hours,
        report,
    );
    require_positive("volatility.hours_per_year", volatility.hours_per_year, report);

    for &window in &volatility.allowed_windows {
        if !(window.is_finite() && window > 0.0) {
            report.add_error(ValidationError::InvalidPositiveFloat {
                field: "volatility.allowed_windows".to_string(),
            });
        } else if window > volatility.max_window_hours {
            report.add_error(ValidationError::WindowAboveMax {
                window,
                max: volatility.max_window_hours,
            });
        }
    }

    let default_listed = volatility.allowed_windows.is_empty()
        || volatility
            .allowed_windows
            .iter()
            .any(|w| (w - volatility.default_window_hours).abs() < 1e-9);
    if !default_listed || volatility.default_window_hours > volatility.max_window_hours {
        report.add_error(ValidationError::DefaultWindowNotAllowed(
            volatility.default_window_hours,
        ));
    }

    if volatility.sort_chronologically {
        report.add_warning(
            "volatility.sort_chronologically",
            "Trades are re-sorted before computing returns; results differ from input-order volatility",
        );
    }
}

fn require_positive(field: &str, value: f64, report: &mut ValidationReport) {
    if !(value.is_finite() && value > 0.0) {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: field.to_string(),
        });
    }
}
