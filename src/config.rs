//! # Configuration Module
//!
//! Runtime settings for the pantry binary and store, read from the environment
//! after loading an optional `.env` file.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::inventory::DEFAULT_HISTORY_LIMIT;

// Defaults
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_PAX: u32 = 2;

// Environment variables
pub const DATA_DIR_VAR: &str = "PANTRY_DATA_DIR";
pub const DEFAULT_PAX_VAR: &str = "PANTRY_DEFAULT_PAX";
pub const HISTORY_LIMIT_VAR: &str = "PANTRY_HISTORY_LIMIT";
pub const LOG_FORMAT_VAR: &str = "PANTRY_LOG_FORMAT";

/// Output format of the binary's log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Pantry application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PantryConfig {
    /// Directory holding the JSON documents of the file store
    pub data_dir: PathBuf,
    /// Servings used when a command does not ask for a specific number
    pub default_pax: u32,
    /// History events kept per ingredient
    pub history_limit: usize,
    pub log_format: LogFormat,
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            default_pax: DEFAULT_PAX,
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_format: LogFormat::default(),
        }
    }
}

impl PantryConfig {
    /// Load `.env` if present, then read overrides from the environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup, unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(pax) = lookup(DEFAULT_PAX_VAR) {
            config.default_pax = pax
                .trim()
                .parse()
                .with_context(|| format!("{DEFAULT_PAX_VAR} must be a positive integer, got '{pax}'"))?;
            anyhow::ensure!(config.default_pax > 0, "{DEFAULT_PAX_VAR} must be at least 1");
        }
        if let Some(limit) = lookup(HISTORY_LIMIT_VAR) {
            config.history_limit = limit
                .trim()
                .parse()
                .with_context(|| format!("{HISTORY_LIMIT_VAR} must be an integer, got '{limit}'"))?;
        }

        if let Some(format) = lookup(LOG_FORMAT_VAR) {
            config.log_format = match format.trim().to_lowercase().as_str() {
                "text" | "" => LogFormat::Text,
                "json" => LogFormat::Json,
                other => anyhow::bail!("{LOG_FORMAT_VAR} must be 'text' or 'json', got '{other}'"),
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = PantryConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PantryConfig::default());
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_overrides() {
        let config = PantryConfig::from_lookup(lookup_from(&[
            (DATA_DIR_VAR, "/tmp/pantry"),
            (DEFAULT_PAX_VAR, " 4 "),
            (HISTORY_LIMIT_VAR, "25"),
            (LOG_FORMAT_VAR, "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/pantry"));
        assert_eq!(config.default_pax, 4);
        assert_eq!(config.history_limit, 25);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(PantryConfig::from_lookup(lookup_from(&[(DEFAULT_PAX_VAR, "two")])).is_err());
        assert!(PantryConfig::from_lookup(lookup_from(&[(DEFAULT_PAX_VAR, "0")])).is_err());
        assert!(PantryConfig::from_lookup(lookup_from(&[(HISTORY_LIMIT_VAR, "-1")])).is_err());
        assert!(PantryConfig::from_lookup(lookup_from(&[(LOG_FORMAT_VAR, "yaml")])).is_err());
    }
}
