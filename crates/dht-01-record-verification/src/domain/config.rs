//! Verifier configuration and validation
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use dht_01_record_verification::VerifierConfigBuilder;
//!
//! let config = VerifierConfigBuilder::new()
//!     .direct_peer_query_fraction(0.5)
//!     .max_record_age(Duration::from_secs(3600))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.direct_peer_query_fraction, 0.5);
//! ```

use std::time::Duration;

use thiserror::Error;

use crate::domain::freshness::{RecordFreshnessPolicy, MAX_RECORD_AGE};

/// Share of the remaining ambient deadline the direct-peer tier may use.
pub const DEFAULT_DIRECT_PEER_QUERY_FRACTION: f64 = 0.3;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Fraction outside `(0, 1]` or not finite.
    #[error("direct_peer_query_fraction must be in (0, 1], got {0}")]
    InvalidFraction(f64),

    /// Zero retention window.
    #[error("max_record_age must be non-zero")]
    ZeroMaxRecordAge,

    /// The configuration source could not be read or parsed.
    #[error("failed to load configuration: {0}")]
    Load(String),
}

/// Tunables for record verification.
#[derive(Clone, Debug, PartialEq)]
pub struct VerifierConfig {
    /// Retention window a node honours absent republishing. Enforced through
    /// [`VerifierConfig::freshness_policy`].
    pub max_record_age: Duration,
    /// Fraction of the remaining deadline allotted to the direct-peer tier.
    pub direct_peer_query_fraction: f64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_record_age: MAX_RECORD_AGE,
            direct_peer_query_fraction: DEFAULT_DIRECT_PEER_QUERY_FRACTION,
        }
    }
}

impl VerifierConfig {
    /// Validate bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fraction = self.direct_peer_query_fraction;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(ConfigError::InvalidFraction(fraction));
        }

        if self.max_record_age.is_zero() {
            return Err(ConfigError::ZeroMaxRecordAge);
        }

        Ok(())
    }

    /// Freshness policy over the configured retention window.
    pub fn freshness_policy(&self) -> RecordFreshnessPolicy {
        RecordFreshnessPolicy::new(self.max_record_age)
    }
}

impl From<&VerifierConfig> for RecordFreshnessPolicy {
    fn from(config: &VerifierConfig) -> Self {
        config.freshness_policy()
    }
}

/// Fluent builder for [`VerifierConfig`].
#[derive(Default)]
pub struct VerifierConfigBuilder {
    max_record_age: Option<Duration>,
    direct_peer_query_fraction: Option<f64>,
}

impl VerifierConfigBuilder {
    /// Start from defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the retention window.
    pub fn max_record_age(mut self, age: Duration) -> Self {
        self.max_record_age = Some(age);
        self
    }

    /// Set the direct-peer deadline fraction.
    pub fn direct_peer_query_fraction(mut self, fraction: f64) -> Self {
        self.direct_peer_query_fraction = Some(fraction);
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<VerifierConfig, ConfigError> {
        let defaults = VerifierConfig::default();
        let config = VerifierConfig {
            max_record_age: self.max_record_age.unwrap_or(defaults.max_record_age),
            direct_peer_query_fraction: self
                .direct_peer_query_fraction
                .unwrap_or(defaults.direct_peer_query_fraction),
        };
        config.validate()?;
        Ok(config)
    }
}
