//! # Verification Errors
//!
//! Caller-facing taxonomy plus the tier-level and port-level errors it is
//! built from.

use std::time::Duration;

use shared_crypto::CryptoError;
use shared_types::PeerId;
use thiserror::Error;

use crate::domain::context::ContextError;
use crate::domain::entities::{FailedCheck, ResolutionTier, TierFailure, VerificationMode};

/// Errors surfaced by the network query and DHT lookup ports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// The remote side has no value for the request.
    #[error("value not found")]
    NotFound,

    /// The transport gave up waiting.
    #[error("request timed out")]
    Timeout,

    /// The peer could not be dialled.
    #[error("peer unreachable: {0}")]
    Unreachable(String),

    /// The peer answered with something that is not a valid response.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Errors surfaced by the key cache port.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyCacheError {
    /// A different key is already bound to this peer.
    #[error("a different key is already cached for peer {peer}")]
    Conflict { peer: PeerId },

    /// The backing store could not be reached.
    #[error("key cache unavailable: {0}")]
    Unavailable(String),
}

/// Structural validation failures from the pluggable record validator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No validator registered for the key's namespace.
    #[error("unknown record namespace: {0}")]
    UnknownNamespace(String),

    /// The record key is not of the form `/<namespace>/<path>`.
    #[error("malformed record key: {0}")]
    MalformedKey(String),

    /// The record value does not parse for its namespace.
    #[error("invalid record value: {0}")]
    InvalidValue(String),

    /// A `/pk/` record whose key does not belong to the id it is stored under.
    #[error("public key record for {expected} holds the key of {derived}")]
    KeyIdMismatch { expected: PeerId, derived: PeerId },

    /// The record is older than the retention window.
    #[error("record expired: age {age_secs}s exceeds {max_age_secs}s")]
    Expired { age_secs: u64, max_age_secs: u64 },
}

/// Why a single resolution tier did not produce a key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// The local cache has no entry for the peer.
    #[error("key not cached")]
    NotCached,

    /// The remote side answered without a key.
    #[error("no public key record returned")]
    NoRecord,

    /// The network port failed.
    #[error("network failure: {0}")]
    Network(NetworkError),

    /// Returned bytes are not a valid public key.
    #[error("malformed public key: {0}")]
    MalformedKey(CryptoError),

    /// The returned key derives to a different peer id than the one queried.
    #[error("identity mismatch: expected {expected}, key derives to {derived}")]
    IdentityMismatch { expected: PeerId, derived: PeerId },

    /// The tier's fractional budget ran out while the ambient deadline had
    /// time left.
    #[error("tier budget of {budget:?} exhausted")]
    TimedOut { budget: Duration },
}

impl ResolutionError {
    /// Whether this is the identity-binding security failure.
    pub fn is_identity_mismatch(&self) -> bool {
        matches!(self, ResolutionError::IdentityMismatch { .. })
    }
}

impl From<NetworkError> for ResolutionError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::NotFound => ResolutionError::NoRecord,
            other => ResolutionError::Network(other),
        }
    }
}

impl From<CryptoError> for ResolutionError {
    fn from(err: CryptoError) -> Self {
        ResolutionError::MalformedKey(err)
    }
}

fn describe_last(failures: &[TierFailure]) -> String {
    match failures.last() {
        Some(failure) => format!(" (last failure at {failure})"),
        None => String::new(),
    }
}

/// The single error returned to callers of `verify` and `resolve_public_key`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    /// No reachable tier produced a key.
    #[error("public key for peer {peer} not found in {mode} mode{}", describe_last(.failures))]
    KeyNotFound {
        peer: PeerId,
        mode: VerificationMode,
        /// Every tier attempted, in order.
        failures: Vec<TierFailure>,
    },

    /// The signature does not verify against the author's key.
    #[error("invalid signature from {author}: {reason}")]
    SignatureInvalid { author: PeerId, reason: CryptoError },

    /// The structural validator rejected the record.
    #[error("structurally invalid record: {0}")]
    StructuralInvalid(#[from] ValidationError),

    /// An offline resolution tried to reach a network tier. Contract violation.
    #[error("offline verification attempted network tier {tier}")]
    OfflineNetworkForbidden { tier: ResolutionTier },

    /// The ambient deadline passed.
    #[error("deadline exceeded{}", describe_last(.failures))]
    DeadlineExceeded {
        /// Tiers that had already failed when the deadline hit.
        failures: Vec<TierFailure>,
    },

    /// The ambient context was cancelled.
    #[error("operation cancelled{}", describe_last(.failures))]
    Cancelled {
        /// Tiers that had already failed when the context was cancelled.
        failures: Vec<TierFailure>,
    },
}

impl VerificationError {
    /// Which check failed.
    pub fn failed_check(&self) -> FailedCheck {
        match self {
            VerificationError::KeyNotFound { .. }
            | VerificationError::OfflineNetworkForbidden { .. } => FailedCheck::Resolution,
            VerificationError::SignatureInvalid { .. } => FailedCheck::Signature,
            VerificationError::StructuralInvalid(_) => FailedCheck::Structure,
            VerificationError::DeadlineExceeded { .. } | VerificationError::Cancelled { .. } => {
                FailedCheck::Context
            }
        }
    }

    /// Tier failures collected before resolution ended.
    pub fn tier_failures(&self) -> &[TierFailure] {
        match self {
            VerificationError::KeyNotFound { failures, .. }
            | VerificationError::DeadlineExceeded { failures }
            | VerificationError::Cancelled { failures } => failures.as_slice(),
            _ => &[],
        }
    }

    /// The most specific resolution cause: the last tier's failure.
    pub fn cause(&self) -> Option<&ResolutionError> {
        self.tier_failures().last().map(|failure| &failure.error)
    }

    /// The identity mismatch encountered during resolution, if any.
    ///
    /// Stays observable even when a later tier failed for another reason or
    /// the context ended mid-resolution.
    pub fn identity_mismatch(&self) -> Option<&ResolutionError> {
        self.tier_failures()
            .iter()
            .map(|failure| &failure.error)
            .find(|error| error.is_identity_mismatch())
    }

    /// Attach the failures of earlier tiers to a context error.
    pub(crate) fn with_failures(self, collected: Vec<TierFailure>) -> Self {
        match self {
            VerificationError::DeadlineExceeded { .. } => {
                VerificationError::DeadlineExceeded { failures: collected }
            }
            VerificationError::Cancelled { .. } => {
                VerificationError::Cancelled { failures: collected }
            }
            other => other,
        }
    }
}

impl From<ContextError> for VerificationError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Cancelled => VerificationError::Cancelled {
                failures: Vec::new(),
            },
            ContextError::DeadlineExceeded => VerificationError::DeadlineExceeded {
                failures: Vec::new(),
            },
        }
    }
}
