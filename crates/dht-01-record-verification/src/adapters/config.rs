use crate::domain::config::{ConfigError, VerifierConfig};
use crate::ports::outbound::ConfigProvider;

// ============================================================================
// StaticConfigProvider - In-code config
// ============================================================================

/// Configuration fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: VerifierConfig,
}

impl StaticConfigProvider {
    /// Provider serving the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider serving `config`.
    #[must_use]
    pub fn with_config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn load(&self) -> Result<VerifierConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config.clone())
    }
}

// ============================================================================
// TomlConfigProvider - File-based config (requires "config-file" feature)
// ============================================================================

#[cfg(feature = "config-file")]
mod toml_config {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    #[derive(Debug, Deserialize, Default)]
    struct ConfigFile {
        #[serde(default)]
        verification: VerificationSection,
    }

    #[derive(Debug, Deserialize, Default)]
    struct VerificationSection {
        direct_peer_query_fraction: Option<f64>,
        max_record_age_secs: Option<u64>,
    }

    /// TOML-backed configuration provider.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [verification]
    /// direct_peer_query_fraction = 0.3
    /// max_record_age_secs = 129600
    /// ```
    ///
    /// Missing keys fall back to the defaults.
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        config: VerifierConfig,
    }

    impl TomlConfigProvider {
        /// Read and parse `path`.
        ///
        /// # Errors
        ///
        /// `ConfigError::Load` if the file cannot be read or parsed; bound
        /// violations as their own variants.
        pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| {
                ConfigError::Load(format!("{}: {}", path.as_ref().display(), e))
            })?;
            Self::parse(&content)
        }

        /// Parse TOML text.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;

            let defaults = VerifierConfig::default();
            let section = file.verification;
            let config = VerifierConfig {
                direct_peer_query_fraction: section
                    .direct_peer_query_fraction
                    .unwrap_or(defaults.direct_peer_query_fraction),
                max_record_age: section
                    .max_record_age_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.max_record_age),
            };
            config.validate()?;

            Ok(Self { config })
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn load(&self) -> Result<VerifierConfig, ConfigError> {
            Ok(self.config.clone())
        }
    }

}

#[cfg(feature = "config-file")]
pub use toml_config::TomlConfigProvider;
