use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PulseConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());
    parse_config(&content)
}

/// Parse a YAML document after environment substitution.
pub fn parse_config(content: &str) -> Result<PulseConfig> {
    let substituted = substitution::substitute_env_vars(content)?;

    let config: PulseConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    debug!(service = %config.service.name, "Configuration parsed");
    Ok(config)
}

/// Load from `path` when given, otherwise use the defaults.
pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<PulseConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            debug!("No config file given, using defaults");
            Ok(generate_default_config())
        }
    }
}

#[instrument]
pub fn generate_default_config() -> PulseConfig {
    PulseConfig::default()
}

#[instrument(skip(config))]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &PulseConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("pulse-config-{}.yaml", std::process::id()));
        let mut config = generate_default_config();
        config.watch.interval_seconds = 5;

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_config("/nonexistent/pulse.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_bad_yaml_is_reported() {
        let err = parse_config("scoring: [not, a, map]").unwrap_err();
        assert!(err.to_string().contains("Failed to parse YAML"));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = load_or_default::<&str>(None).unwrap();
        assert_eq!(config, PulseConfig::default());
    }
}
