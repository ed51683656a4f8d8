//! Telemetry configuration from environment variables.

use std::env;

/// Default service name in log output
pub const DEFAULT_SERVICE_NAME: &str = "dht-node";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    pub service_name: String,

    /// Filter directive (`info`, `dht_01_record_verification=debug`, ...)
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output
    pub json_logs: bool,

    /// Include file and line in each event
    pub with_source_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_source_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DHT_SERVICE_NAME`: Service name (default: dht-node)
    /// - `DHT_LOG_LEVEL` or `RUST_LOG`: Filter directive (default: info)
    /// - `DHT_JSON_LOGS`: `true`/`1` for JSON output (default: false)
    /// - `DHT_LOG_SOURCE`: `true`/`1` to include file and line (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false)
        };

        Self {
            service_name: lookup("DHT_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: lookup("DHT_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logs: flag("DHT_JSON_LOGS"),
            with_source_location: flag("DHT_LOG_SOURCE"),
        }
    }

    /// Same configuration with a different filter directive
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
