//! Keeper configuration.
//!
//! [`KeeperConfig`] has defaults suitable for a standard host chain and can be
//! loaded from `BUDGET_*` environment variables.

use anyhow::{bail, Context, Result};

use budget_core::constants::MODULE_NAME;

/// Configuration for a [`Keeper`](crate::Keeper) instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeeperConfig {
    /// Module name used for module account derivation.
    pub module_name: String,
    /// Skip collection unless `height % epoch_blocks == 0`. Hosts that gate
    /// the hook themselves set this to `false`.
    pub enforce_epoch_cadence: bool,
    /// Log level filter string (e.g. "info", "debug", "budget_keeper=trace").
    pub log_level: String,
    /// Log output format: "text" or "json".
    pub log_format: String,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            module_name: MODULE_NAME.to_string(),
            enforce_epoch_cadence: true,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl KeeperConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let module_name = lookup("BUDGET_MODULE_NAME").unwrap_or(defaults.module_name);
        if module_name.is_empty() {
            bail!("BUDGET_MODULE_NAME must not be empty");
        }

        let enforce_epoch_cadence = match lookup("BUDGET_ENFORCE_EPOCH_CADENCE") {
            Some(value) => parse_bool(&value)
                .context("BUDGET_ENFORCE_EPOCH_CADENCE must be true or false")?,
            None => defaults.enforce_epoch_cadence,
        };

        let log_level = lookup("BUDGET_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_format = lookup("BUDGET_LOG_FORMAT").unwrap_or(defaults.log_format);
        if log_format != "text" && log_format != "json" {
            bail!("BUDGET_LOG_FORMAT must be \"text\" or \"json\", got {log_format:?}");
        }

        Ok(Self {
            module_name,
            enforce_epoch_cadence,
            log_level,
            log_format,
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("unrecognised boolean {other:?}"),
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
    fn defaults() {
        let config = KeeperConfig::default();
        assert_eq!(config.module_name, "budget");
        assert!(config.enforce_epoch_cadence);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, "text");
    }

    #[test]
    fn empty_lookup_gives_defaults() {
        let config = KeeperConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, KeeperConfig::default());
    }

    #[test]
    fn lookup_overrides() {
        let config = KeeperConfig::from_lookup(lookup_from(&[
            ("BUDGET_MODULE_NAME", "farming"),
            ("BUDGET_ENFORCE_EPOCH_CADENCE", "false"),
            ("BUDGET_LOG_LEVEL", "debug"),
            ("BUDGET_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.module_name, "farming");
        assert!(!config.enforce_epoch_cadence);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, "json");
    }

    #[test]
    fn rejects_malformed_values() {
        let err = KeeperConfig::from_lookup(lookup_from(&[("BUDGET_ENFORCE_EPOCH_CADENCE", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("BUDGET_ENFORCE_EPOCH_CADENCE"));

        assert!(KeeperConfig::from_lookup(lookup_from(&[("BUDGET_LOG_FORMAT", "xml")])).is_err());
        assert!(KeeperConfig::from_lookup(lookup_from(&[("BUDGET_MODULE_NAME", "")])).is_err());
    }

    #[test]
    fn parse_bool_variants() {
        assert!(parse_bool(" TRUE ").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("no").unwrap());
        assert!(parse_bool("").is_err());
    }
}
