pub fn default_service_name() -> String {
    "market-pulse".to_string()
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_enabled() -> bool {
    false
}

pub fn default_metrics_port() -> u16 {
    9090
}

pub fn default_watch_interval_seconds() -> u64 {
    30
}

/// Log formats understood by the observability crate
pub const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];
