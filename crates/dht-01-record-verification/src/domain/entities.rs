//! # Verification Entities
//!
//! Modes, resolution tiers, and the per-tier outcome the resolver iterates
//! over.

use std::fmt;

use shared_crypto::PublicKey;

use crate::domain::errors::{ResolutionError, VerificationError};

/// Whether key resolution may touch the network.
///
/// Not stored anywhere; threaded through every verification call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum VerificationMode {
    /// Local cache only. The default for records passively received from
    /// arbitrary peers (store/announce requests).
    #[default]
    Offline,
    /// Cache, then direct peer query, then DHT lookup. Reserved for call
    /// sites already doing network I/O on the caller's behalf.
    Online,
}

impl VerificationMode {
    /// Whether network tiers are reachable in this mode.
    pub fn allows_network(self) -> bool {
        matches!(self, VerificationMode::Online)
    }
}

impl fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationMode::Offline => write!(f, "offline"),
            VerificationMode::Online => write!(f, "online"),
        }
    }
}

/// One strategy in the ordered key-resolution chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolutionTier {
    /// Local key cache lookup.
    LocalCache,
    /// Ask the peer itself for its key, under a fractional deadline.
    DirectPeer,
    /// Generic DHT value lookup under the `/pk/` namespace.
    DhtLookup,
}

impl ResolutionTier {
    const ONLINE: [ResolutionTier; 3] = [
        ResolutionTier::LocalCache,
        ResolutionTier::DirectPeer,
        ResolutionTier::DhtLookup,
    ];
    const OFFLINE: [ResolutionTier; 1] = [ResolutionTier::LocalCache];

    /// Ordered tiers reachable in `mode`.
    pub fn plan(mode: VerificationMode) -> &'static [ResolutionTier] {
        match mode {
            VerificationMode::Offline => &Self::OFFLINE,
            VerificationMode::Online => &Self::ONLINE,
        }
    }

    /// Whether this tier performs network I/O.
    pub fn requires_network(self) -> bool {
        !matches!(self, ResolutionTier::LocalCache)
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionTier::LocalCache => write!(f, "local-cache"),
            ResolutionTier::DirectPeer => write!(f, "direct-peer"),
            ResolutionTier::DhtLookup => write!(f, "dht-lookup"),
        }
    }
}

/// Tagged result of running one tier.
#[derive(Debug)]
pub enum TierOutcome {
    /// Key found; stop.
    Resolved(PublicKey),
    /// This tier failed locally; try the next one.
    Continue(ResolutionError),
    /// The whole resolution must stop (cancellation, expired deadline,
    /// contract violation).
    Abort(VerificationError),
}

/// A tier that was attempted and what went wrong there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierFailure {
    /// Tier attempted.
    pub tier: ResolutionTier,
    /// Why it did not produce a key.
    pub error: ResolutionError,
}

impl fmt::Display for TierFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tier, self.error)
    }
}

/// Which check a failed verification tripped over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailedCheck {
    /// The author's key could not be obtained.
    Resolution,
    /// The signature did not verify against the resolved key.
    Signature,
    /// The structural validator rejected the record.
    Structure,
    /// The ambient context was cancelled or ran out of time.
    Context,
}

impl fmt::Display for FailedCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailedCheck::Resolution => write!(f, "resolution"),
            FailedCheck::Signature => write!(f, "signature"),
            FailedCheck::Structure => write!(f, "structure"),
            FailedCheck::Context => write!(f, "context"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_plan_is_cache_only() {
        let plan = ResolutionTier::plan(VerificationMode::Offline);
        assert_eq!(plan, &[ResolutionTier::LocalCache]);
        assert!(plan.iter().all(|tier| !tier.requires_network()));
    }

    #[test]
    fn test_online_plan_order() {
        assert_eq!(
            ResolutionTier::plan(VerificationMode::Online),
            &[
                ResolutionTier::LocalCache,
                ResolutionTier::DirectPeer,
                ResolutionTier::DhtLookup
            ]
        );
    }

    #[test]
    fn test_default_mode_is_offline() {
        assert_eq!(VerificationMode::default(), VerificationMode::Offline);
        assert!(!VerificationMode::default().allows_network());
    }
}
