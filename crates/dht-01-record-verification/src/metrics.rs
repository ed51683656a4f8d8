//! Counters for verification and key resolution
//!
//! Lock-free atomics shared by every concurrent call on a service.
//!
//! ## Usage
//!
//! ```ignore
//! let service = RecordVerificationService::new(...);
//! // ... verify records ...
//! let snapshot = service.metrics().snapshot();
//! println!("passed={} signature failures={}", snapshot.verifications_passed,
//!     snapshot.signature_failures);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::entities::{FailedCheck, ResolutionTier};

/// Verification metrics collector.
#[derive(Debug, Default)]
pub struct VerificationMetrics {
    /// Records that passed every check
    pub verifications_passed: AtomicU64,
    /// Failures because the author's key was not obtained
    pub resolution_failures: AtomicU64,
    /// Failures on the cryptographic check
    pub signature_failures: AtomicU64,
    /// Failures on the structural check
    pub structure_failures: AtomicU64,
    /// Failures because the ambient context ended
    pub context_failures: AtomicU64,
    /// Keys served from the local cache
    pub resolved_from_cache: AtomicU64,
    /// Keys obtained from the peer itself
    pub resolved_from_peer: AtomicU64,
    /// Keys obtained from a DHT lookup
    pub resolved_from_dht: AtomicU64,
    /// Keys rejected because they derive to another identity
    pub identity_mismatches: AtomicU64,
    /// Signed records rejected offline for lack of a cached key
    pub offline_key_misses: AtomicU64,
}

impl VerificationMetrics {
    /// New zeroed collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful verification.
    pub fn record_passed(&self) {
        self.verifications_passed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed verification by the check that failed.
    pub fn record_failed(&self, check: FailedCheck) {
        let counter = match check {
            FailedCheck::Resolution => &self.resolution_failures,
            FailedCheck::Signature => &self.signature_failures,
            FailedCheck::Structure => &self.structure_failures,
            FailedCheck::Context => &self.context_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record which tier produced a key.
    pub fn record_resolved(&self, tier: ResolutionTier) {
        let counter = match tier {
            ResolutionTier::LocalCache => &self.resolved_from_cache,
            ResolutionTier::DirectPeer => &self.resolved_from_peer,
            ResolutionTier::DhtLookup => &self.resolved_from_dht,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a key that failed the identity binding check.
    pub fn record_identity_mismatch(&self) {
        self.identity_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an offline verification that found no cached key.
    pub fn record_offline_miss(&self) {
        self.offline_key_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> VerificationMetricsSnapshot {
        VerificationMetricsSnapshot {
            verifications_passed: self.verifications_passed.load(Ordering::Relaxed),
            resolution_failures: self.resolution_failures.load(Ordering::Relaxed),
            signature_failures: self.signature_failures.load(Ordering::Relaxed),
            structure_failures: self.structure_failures.load(Ordering::Relaxed),
            context_failures: self.context_failures.load(Ordering::Relaxed),
            resolved_from_cache: self.resolved_from_cache.load(Ordering::Relaxed),
            resolved_from_peer: self.resolved_from_peer.load(Ordering::Relaxed),
            resolved_from_dht: self.resolved_from_dht.load(Ordering::Relaxed),
            identity_mismatches: self.identity_mismatches.load(Ordering::Relaxed),
            offline_key_misses: self.offline_key_misses.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of [`VerificationMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerificationMetricsSnapshot {
    pub verifications_passed: u64,
    pub resolution_failures: u64,
    pub signature_failures: u64,
    pub structure_failures: u64,
    pub context_failures: u64,
    pub resolved_from_cache: u64,
    pub resolved_from_peer: u64,
    pub resolved_from_dht: u64,
    pub identity_mismatches: u64,
    pub offline_key_misses: u64,
}

impl VerificationMetricsSnapshot {
    /// Total verifications that failed for any reason.
    pub fn verifications_failed(&self) -> u64 {
        self.resolution_failures
            + self.signature_failures
            + self.structure_failures
            + self.context_failures
    }

    /// Keys obtained through network tiers.
    pub fn network_resolutions(&self) -> u64 {
        self.resolved_from_peer + self.resolved_from_dht
    }
}
