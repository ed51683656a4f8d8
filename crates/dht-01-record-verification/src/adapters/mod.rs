//! # Adapters
//!
//! Concrete implementations of the outbound ports that live in-process.
//! Network adapters (peer query, DHT lookup) belong to the transport layer
//! and are injected by the node.

pub mod config;
pub mod key_cache;
pub mod signature;
pub mod validator;

pub use config::StaticConfigProvider;
#[cfg(feature = "config-file")]
pub use config::TomlConfigProvider;
pub use key_cache::InMemoryKeyCache;
pub use signature::{record_signing_blob, sign_record, RecordSignatureChecker};
pub use validator::{FreshnessValidator, NamespacedValidator, PublicKeyValidator, SystemTimeSource};
