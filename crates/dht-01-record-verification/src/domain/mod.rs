//! Domain layer: pure verification logic, no I/O.

pub mod config;
pub mod context;
pub mod entities;
pub mod errors;
pub mod freshness;
pub mod keys;

pub use config::{ConfigError, VerifierConfig, VerifierConfigBuilder};
pub use context::{CancelHandle, ContextError, OperationContext};
pub use entities::{FailedCheck, ResolutionTier, TierFailure, TierOutcome, VerificationMode};
pub use errors::{KeyCacheError, NetworkError, ResolutionError, ValidationError, VerificationError};
pub use freshness::{RecordFreshnessPolicy, MAX_RECORD_AGE};
pub use keys::{public_key_lookup_key, split_namespace, PUBLIC_KEY_NAMESPACE};
