use anyhow::Result;
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const PLACEHOLDER: &str = r"\$\{(\w+)\}|\$(\w+)";

/// Replace `${VAR_NAME}` and `$VAR_NAME` with values from the environment.
///
/// Unset variables are left in place; validation reports them.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    substitute_with(content, |name| env::var(name).ok())
}

/// Same as [`substitute_env_vars`] with an explicit lookup.
pub fn substitute_with<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(PLACEHOLDER)?;
    let mut missing = Vec::new();

    let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        match lookup(name) {
            Some(value) => {
                debug!(var = name, "Substituted environment variable");
                value
            }
            None => {
                warn!("Environment variable '{}' not set", name);
                missing.push(name.to_string());
                caps[0].to_string()
            }
        }
    });

    if !missing.is_empty() {
        debug!(?missing, "Placeholders left unresolved");
    }

    Ok(result.into_owned())
}

/// Names of placeholders still present in `content`
pub fn unresolved_env_vars(content: &str) -> Result<Vec<String>> {
    let re = Regex::new(PLACEHOLDER)?;
    Ok(re
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "PULSE_PORT" => Some("9100".to_string()),
            "PULSE_FORMAT" => Some("json".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_both_placeholder_forms() {
        let out = substitute_with("port: ${PULSE_PORT}\nformat: $PULSE_FORMAT", lookup).unwrap();
        assert_eq!(out, "port: 9100\nformat: json");
    }

    #[test]
    fn test_missing_vars_are_kept() {
        let out = substitute_with("name: ${PULSE_NAME}", lookup).unwrap();
        assert_eq!(out, "name: ${PULSE_NAME}");
        assert_eq!(unresolved_env_vars(&out).unwrap(), vec!["PULSE_NAME"]);
    }

    #[test]
    fn test_plain_text_untouched() {
        let out = substitute_with("weights: {spread: 0.3}", lookup).unwrap();
        assert_eq!(out, "weights: {spread: 0.3}");
        assert!(unresolved_env_vars(&out).unwrap().is_empty());
    }
}
