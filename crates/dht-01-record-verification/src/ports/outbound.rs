//! # Outbound Ports (Driven Ports / SPI)
//!
//! Capabilities the verifier consumes but does not implement: the peer key
//! cache, the single-peer key exchange, the generic DHT lookup, structural
//! validation, signature checking, and configuration.

use async_trait::async_trait;
use shared_crypto::{CryptoError, PublicKey};
use shared_types::{PeerId, Record};

use crate::domain::config::{ConfigError, VerifierConfig};
use crate::domain::context::OperationContext;
use crate::domain::errors::{KeyCacheError, NetworkError, ValidationError};

/// Process-wide peer key cache (the peerstore).
///
/// Shared across concurrent resolutions. Implementations must make a
/// single entry safe to read and write concurrently; readers never observe
/// a partially written key.
pub trait KeyCache: Send + Sync {
    /// The cached key for `peer`, if any.
    fn lookup(&self, peer: &PeerId) -> Option<PublicKey>;

    /// Bind `key` to `peer`. Re-storing the same key is not an error.
    ///
    /// # Errors
    /// * `KeyCacheError::Conflict` - a different key is already bound
    /// * `KeyCacheError::Unavailable` - backing store failure
    fn store(&self, peer: PeerId, key: PublicKey) -> Result<(), KeyCacheError>;
}

/// Targeted exchange with a single peer asking for its own public key.
#[async_trait]
pub trait PeerKeyQuery: Send + Sync {
    /// Ask `peer` for its marshalled public key.
    ///
    /// `Ok(None)` means the peer answered without a key. Implementations
    /// should honour `ctx`; the resolver also races the call against it.
    async fn request_public_key(
        &self,
        ctx: &OperationContext,
        peer: &PeerId,
    ) -> Result<Option<Vec<u8>>, NetworkError>;
}

/// Generic overlay value lookup.
#[async_trait]
pub trait DhtValueLookup: Send + Sync {
    /// Best value stored under `key`.
    async fn get_value(&self, ctx: &OperationContext, key: &[u8]) -> Result<Vec<u8>, NetworkError>;
}

/// Pluggable per-namespace structural rules (freshness, namespace, format).
pub trait RecordValidator: Send + Sync {
    /// Check everything about `record` except its signature.
    fn verify_structure(&self, record: &Record) -> Result<(), ValidationError>;
}

/// Cryptographic check that `record.signature` binds its author to its payload.
pub trait SignatureChecker: Send + Sync {
    /// Verify the record's signature against `key`.
    fn check_signature(&self, record: &Record, key: &PublicKey) -> Result<(), CryptoError>;
}

/// Source of [`VerifierConfig`].
pub trait ConfigProvider: Send + Sync {
    /// Load (and validate) the configuration.
    fn load(&self) -> Result<VerifierConfig, ConfigError>;
}

/// Wall clock in unix seconds.
pub trait TimeSource: Send + Sync {
    /// Current time.
    fn now(&self) -> u64;
}
