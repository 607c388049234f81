//! PTA settings loading from config.toml
//!
//! The settings file is optional. Any key left out falls back to its default, and a
//! missing file yields [`PtaConfig::default`].

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// What linking does when the student already belongs to a different parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPolicy {
    /// Refuse the link and report the existing parent
    #[default]
    Reject,
    /// Move the student to the new parent
    Replace,
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PtaConfig {
    /// School name shown in bot replies
    pub school_name: String,
    /// Currency symbol used when formatting amounts
    pub currency_symbol: String,
    /// Collection target used for the "percent of target" statistic
    pub target_amount: f64,
    /// Behavior when linking a student that already has a parent
    pub link_policy: LinkPolicy,
    /// Payment methods offered for autocomplete
    pub payment_methods: Vec<String>,
    /// How many payments the recent payments listing shows
    pub recent_payments_limit: u64,
}

impl Default for PtaConfig {
    fn default() -> Self {
        Self {
            school_name: "PTA".to_string(),
            currency_symbol: "₱".to_string(),
            target_amount: 0.0,
            link_policy: LinkPolicy::Reject,
            payment_methods: ["cash", "gcash", "bank transfer", "check"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            recent_payments_limit: 5,
        }
    }
}

impl PtaConfig {
    /// Formats an amount with the configured currency symbol, e.g. `₱500.00`.
    #[must_use]
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{amount:.2}", self.currency_symbol)
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PtaConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    let config: PtaConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse TOML from config file {path_ref:?}: {e}"),
    })?;

    if !config.target_amount.is_finite() || config.target_amount < 0.0 {
        return Err(Error::Config {
            message: format!("target_amount must be non-negative, got {}", config.target_amount),
        });
    }

    Ok(config)
}

/// Loads settings from `PTA_CONFIG` (default `./config.toml`), using defaults when the
/// file does not exist.
pub fn load_app_configuration() -> Result<PtaConfig> {
    let path = std::env::var("PTA_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        info!("No configuration file at {path}, using defaults");
        return Ok(PtaConfig::default());
    }
    let config = load_config(&path)?;
    info!("Loaded configuration for {}", config.school_name);
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            school_name = "Sampaguita Elementary"
            currency_symbol = "$"
            target_amount = 25000.0
            link_policy = "replace"
            payment_methods = ["cash", "gcash"]
            recent_payments_limit = 3
        "#;

        let config: PtaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.school_name, "Sampaguita Elementary");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.target_amount, 25000.0);
        assert_eq!(config.link_policy, LinkPolicy::Replace);
        assert_eq!(config.payment_methods, vec!["cash", "gcash"]);
        assert_eq!(config.recent_payments_limit, 3);
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config: PtaConfig = toml::from_str(r#"school_name = "Test School""#).unwrap();
        assert_eq!(config.school_name, "Test School");
        assert_eq!(config.currency_symbol, "₱");
        assert_eq!(config.link_policy, LinkPolicy::Reject);
        assert_eq!(config.payment_methods.len(), 4);
        assert_eq!(config.recent_payments_limit, 5);
    }

    #[test]
    fn test_invalid_link_policy_rejected() {
        let result: std::result::Result<PtaConfig, _> =
            toml::from_str(r#"link_policy = "merge""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_format_amount() {
        let config = PtaConfig::default();
        assert_eq!(config.format_amount(500.0), "₱500.00");
    }
}
