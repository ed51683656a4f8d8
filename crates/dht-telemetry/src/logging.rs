//! Subscriber installation and structured logging macros.
//!
//! Events share a small set of field names so log queries work across
//! crates:
//! - `peer_id`: peer the event concerns
//! - `record_key`: DHT key of the record the event concerns
//! - `subsystem`: emitting component

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber.
///
/// Returns `Ok(false)` if another subscriber was already installed.
pub(crate) fn install_subscriber(config: &TelemetryConfig) -> Result<bool, TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))?;

    let outcome = if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(config.with_source_location)
            .with_line_number(config.with_source_location);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(config.with_source_location)
            .with_line_number(config.with_source_location);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    Ok(outcome.is_ok())
}

/// Log a peer-related event with standard fields.
///
/// ```
/// dht_telemetry::log_peer_event!(debug, "resolver", "peer answered", "12D3KooW", tier = "direct-peer");
/// ```
#[macro_export]
macro_rules! log_peer_event {
    ($level:ident, $subsystem:expr, $msg:expr, $peer_id:expr $(, $($field:tt)*)?) => {
        $crate::tracing::$level!(
            subsystem = $subsystem,
            peer_id = %$peer_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a record-related event with standard fields.
///
/// The key is rendered lossily as UTF-8, since record keys are mostly
/// path-like.
#[macro_export]
macro_rules! log_record_event {
    ($level:ident, $subsystem:expr, $msg:expr, $record_key:expr $(, $($field:tt)*)?) => {
        $crate::tracing::$level!(
            subsystem = $subsystem,
            record_key = %String::from_utf8_lossy($record_key),
            $($($field)*,)?
            $msg
        )
    };
}
