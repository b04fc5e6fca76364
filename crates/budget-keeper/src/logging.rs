//! Tracing subscriber setup for hosts and tests.

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::KeeperConfig;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides `level`. Pass `format = "json"` for structured JSON
/// output; any other value gives human-readable text. Returns `false` if a
/// global subscriber was already installed.
pub fn init_tracing(level: &str, format: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true))
            .try_init()
            .is_ok()
    }
}

/// [`init_tracing`] with the level and format from `config`.
pub fn init_from_config(config: &KeeperConfig) -> bool {
    init_tracing(&config.log_level, &config.log_format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let _ = init_tracing("debug", "text");
        assert!(!init_tracing("info", "json"));
        assert!(!init_from_config(&KeeperConfig::default()));
    }
}
