//! # DHT Telemetry
//!
//! Logging setup shared by the DHT node crates.
//!
//! Library crates only emit through the `tracing` facade. Binaries and test
//! harnesses call [`init_logging`] once to decide where those events go.
//!
//! ## Usage
//!
//! ```
//! use dht_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_logging(&config)?;
//! tracing::info!("node starting");
//! # Ok::<(), dht_telemetry::TelemetryError>(())
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DHT_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directive |
//! | `DHT_JSON_LOGS` | `false` | JSON lines output |
//! | `DHT_LOG_SOURCE` | `false` | File and line in events |
//! | `DHT_SERVICE_NAME` | `dht-node` | Service name |

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};

use thiserror::Error;

#[doc(hidden)]
pub use tracing;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid log filter directive: {0}")]
    InvalidFilter(String),
}

/// Install the process-wide subscriber described by `config`.
///
/// A subscriber installed earlier (another test, an embedding application)
/// is left in place; the returned guard reports whether this call won.
pub fn init_logging(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let installed = logging::install_subscriber(config)?;

    if installed {
        tracing::info!(
            service = %config.service_name,
            filter = %config.log_level,
            json = config.json_logs,
            "logging initialized"
        );
    }

    Ok(TelemetryGuard {
        service_name: config.service_name.clone(),
        installed,
    })
}

/// Handle returned by [`init_logging`]. Hold it for the process lifetime.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
    installed: bool,
}

impl TelemetryGuard {
    /// Whether this call installed the global subscriber
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if self.installed {
            tracing::info!(service = %self.service_name, "shutting down logging");
        }
    }
}
