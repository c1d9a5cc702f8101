//! Startup orchestration.
//!
//! Config first, then logging and metrics; listeners are bound by the caller
//! last so traffic only arrives once everything is ready. Any error here is
//! fatal.

use std::path::Path;

use crate::config::{load_config, ConfigError, GatewayConfig};
use crate::observability::{logging, metrics};

/// Load `path` if given, otherwise fall back to defaults.
pub fn load_startup_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(GatewayConfig::default()),
    }
}

/// Install logging and, when enabled, the metrics exporter.
pub fn init_observability(config: &GatewayConfig) {
    logging::init_logging(&config.observability.log_level);

    if !config.observability.metrics_enabled {
        return;
    }
    match config.observability.metrics_address.parse() {
        Ok(addr) => metrics::init_metrics(addr),
        Err(_) => tracing::error!(
            metrics_address = %config.observability.metrics_address,
            "Failed to parse metrics address"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_path() {
        let config = load_startup_config(None).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}
