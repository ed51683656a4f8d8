//! # DHT Record Verification (DHT-01)
//!
//! Decides whether a record received from anywhere is trustworthy, and when
//! the author's public key is unknown, how to obtain it safely.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): modes, tiers, errors, deadline context, freshness
//! - **Ports Layer** (`ports/`): `RecordVerificationApi` in, cache/network/validator out
//! - **Service Layer** (`service/`): `PeerKeyResolver` and `RecordVerificationService`
//! - **Adapters Layer** (`adapters/`): in-memory key cache, signature checker,
//!   namespaced validators, config providers
//!
//! ## Key Resolution
//!
//! ```text
//! LocalCache ──miss──▶ DirectPeer (30% of remaining deadline) ──fail──▶ DhtLookup (/pk/<id>)
//!     │                    │ key must derive to the queried id           │
//!     ▼                    ▼                                              ▼
//!   key                  key + cache                                   key + cache
//! ```
//!
//! ## Security Notes
//!
//! - **Offline by default**: records pushed at us by peers are verified
//!   against the local cache only. Network resolution for them would let
//!   anyone flood the node with records from fabricated authors, each
//!   costing a DHT walk.
//! - **Identity binding**: a key a peer hands us for itself is discarded
//!   unless it derives to that peer's id.
//! - **Append-only cache**: the first key bound to an id stays bound.
//!
//! ## Features
//!
//! - `config-file`: `TomlConfigProvider`
//! - `test-utils`: scripted port fakes with call counters

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export public API
pub use adapters::{
    record_signing_blob, sign_record, FreshnessValidator, InMemoryKeyCache, NamespacedValidator,
    PublicKeyValidator, RecordSignatureChecker, StaticConfigProvider, SystemTimeSource,
};
#[cfg(feature = "config-file")]
pub use adapters::TomlConfigProvider;
pub use domain::{
    public_key_lookup_key, CancelHandle, ConfigError, ContextError, FailedCheck, KeyCacheError,
    NetworkError, OperationContext, RecordFreshnessPolicy, ResolutionError, ResolutionTier,
    TierFailure, TierOutcome, ValidationError, VerificationError, VerificationMode,
    VerifierConfig, VerifierConfigBuilder, MAX_RECORD_AGE,
};
pub use metrics::{VerificationMetrics, VerificationMetricsSnapshot};
pub use ports::{
    ConfigProvider, DhtValueLookup, KeyCache, PeerKeyQuery, RecordValidator,
    RecordVerificationApi, SignatureChecker, TimeSource,
};
pub use service::{PeerKeyResolver, RecordVerificationService, VerifierDependencies};
