//! # Peer Key Resolver
//!
//! Obtains the public key owning a `PeerId` through an ordered chain of
//! tiers: local cache, the peer itself, then a DHT lookup under `/pk/`.
//!
//! Tiers run strictly one after another. Each returns a [`TierOutcome`]; the
//! loop stops on the first `Resolved` or `Abort` and otherwise records the
//! failure and moves on.

use std::sync::Arc;

use shared_crypto::{derive_peer_id, unmarshal_public_key, PublicKey};
use shared_types::PeerId;
use tracing::{debug, error, info_span, warn, Instrument};

use crate::domain::config::VerifierConfig;
use crate::domain::context::OperationContext;
use crate::domain::entities::{ResolutionTier, TierFailure, TierOutcome, VerificationMode};
use crate::domain::errors::{KeyCacheError, ResolutionError, VerificationError};
use crate::domain::keys::public_key_lookup_key;
use crate::metrics::VerificationMetrics;
use crate::ports::outbound::{DhtValueLookup, KeyCache, PeerKeyQuery};

/// Three-tier public key resolver.
pub struct PeerKeyResolver {
    cache: Arc<dyn KeyCache>,
    peer_query: Arc<dyn PeerKeyQuery>,
    dht: Arc<dyn DhtValueLookup>,
    direct_peer_fraction: f64,
    metrics: Arc<VerificationMetrics>,
}

impl PeerKeyResolver {
    /// Create a resolver over the given capabilities.
    pub fn new(
        cache: Arc<dyn KeyCache>,
        peer_query: Arc<dyn PeerKeyQuery>,
        dht: Arc<dyn DhtValueLookup>,
        config: &VerifierConfig,
    ) -> Self {
        Self {
            cache,
            peer_query,
            dht,
            direct_peer_fraction: config.direct_peer_query_fraction,
            metrics: Arc::new(VerificationMetrics::new()),
        }
    }

    /// Report into a shared metrics collector.
    pub fn with_metrics(mut self, metrics: Arc<VerificationMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Metrics collector this resolver reports into.
    pub fn metrics(&self) -> &Arc<VerificationMetrics> {
        &self.metrics
    }

    /// Resolve the key for `peer` using the tiers `mode` permits.
    ///
    /// # Errors
    /// * `KeyNotFound` - every reachable tier failed; carries each failure
    /// * `Cancelled` / `DeadlineExceeded` - the ambient context ended; carries
    ///   the tiers that failed before it did
    /// * `OfflineNetworkForbidden` - contract violation, see below
    pub async fn resolve(
        &self,
        ctx: &OperationContext,
        peer: &PeerId,
        mode: VerificationMode,
    ) -> Result<PublicKey, VerificationError> {
        let span = info_span!("resolve_public_key", peer = %peer, mode = %mode);
        self.resolve_in_span(ctx, peer, mode).instrument(span).await
    }

    async fn resolve_in_span(
        &self,
        ctx: &OperationContext,
        peer: &PeerId,
        mode: VerificationMode,
    ) -> Result<PublicKey, VerificationError> {
        let mut failures = Vec::new();

        for &tier in ResolutionTier::plan(mode) {
            // Unreachable through `plan`; guards against future plan edits.
            if tier.requires_network() && !mode.allows_network() {
                error!(%tier, "offline resolution attempted a network tier");
                return Err(VerificationError::OfflineNetworkForbidden { tier });
            }

            match self.run_tier(tier, ctx, peer).await {
                TierOutcome::Resolved(key) => {
                    self.metrics.record_resolved(tier);
                    debug!(%tier, "public key resolved");
                    if tier.requires_network() {
                        return Ok(self.remember(*peer, key));
                    }
                    return Ok(key);
                }
                TierOutcome::Continue(error) => {
                    if error.is_identity_mismatch() {
                        self.metrics.record_identity_mismatch();
                    } else {
                        debug!(%tier, %error, "tier did not produce a key");
                    }
                    failures.push(TierFailure { tier, error });
                }
                TierOutcome::Abort(err) => {
                    debug!(%tier, error = %err, "resolution aborted");
                    return Err(err.with_failures(failures));
                }
            }
        }

        Err(VerificationError::KeyNotFound {
            peer: *peer,
            mode,
            failures,
        })
    }

    async fn run_tier(
        &self,
        tier: ResolutionTier,
        ctx: &OperationContext,
        peer: &PeerId,
    ) -> TierOutcome {
        match tier {
            ResolutionTier::LocalCache => match self.cache.lookup(peer) {
                Some(key) => TierOutcome::Resolved(key),
                None => TierOutcome::Continue(ResolutionError::NotCached),
            },
            ResolutionTier::DirectPeer => self.query_peer(ctx, peer).await,
            ResolutionTier::DhtLookup => self.query_dht(ctx, peer).await,
        }
    }

    /// Ask the peer for its own key under a fraction of the remaining budget,
    /// then prove the key belongs to it.
    async fn query_peer(&self, ctx: &OperationContext, peer: &PeerId) -> TierOutcome {
        if let Some(err) = ctx.err() {
            return TierOutcome::Abort(err.into());
        }

        let child = ctx.with_deadline_fraction(self.direct_peer_fraction);
        let budget = child.remaining().unwrap_or_default();

        let reply = match child
            .run(self.peer_query.request_public_key(&child, peer))
            .await
        {
            Ok(reply) => reply,
            // Child budget spent but the caller still has time: fall through.
            Err(_) => match ctx.err() {
                Some(ambient) => return TierOutcome::Abort(ambient.into()),
                None => return TierOutcome::Continue(ResolutionError::TimedOut { budget }),
            },
        };

        let bytes = match reply {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return TierOutcome::Continue(ResolutionError::NoRecord),
            Err(err) => return TierOutcome::Continue(err.into()),
        };

        let key = match unmarshal_public_key(&bytes) {
            Ok(key) => key,
            Err(err) => return TierOutcome::Continue(err.into()),
        };

        let derived = derive_peer_id(&key);
        if derived != *peer {
            warn!(
                expected = %peer,
                derived = %derived,
                "peer returned a public key bound to a different identity"
            );
            return TierOutcome::Continue(ResolutionError::IdentityMismatch {
                expected: *peer,
                derived,
            });
        }

        TierOutcome::Resolved(key)
    }

    /// Look the key up under `/pk/<peer>` with whatever ambient budget is left.
    ///
    /// The namespaced lookup key already binds the value to `peer`, so no
    /// identity re-check happens here.
    async fn query_dht(&self, ctx: &OperationContext, peer: &PeerId) -> TierOutcome {
        let lookup_key = public_key_lookup_key(peer);

        match ctx.run(self.dht.get_value(ctx, &lookup_key)).await {
            Err(err) => TierOutcome::Abort(err.into()),
            Ok(Err(err)) => TierOutcome::Continue(err.into()),
            Ok(Ok(bytes)) => match unmarshal_public_key(&bytes) {
                Ok(key) => TierOutcome::Resolved(key),
                Err(err) => TierOutcome::Continue(err.into()),
            },
        }
    }

    /// Cache a network-resolved key. First writer wins: on conflict the
    /// already cached key is authoritative and is returned instead.
    fn remember(&self, peer: PeerId, key: PublicKey) -> PublicKey {
        match self.cache.store(peer, key) {
            Ok(()) => key,
            Err(KeyCacheError::Conflict { .. }) => {
                warn!(%peer, "resolved key differs from cached key; keeping cached key");
                self.cache.lookup(&peer).unwrap_or(key)
            }
            Err(err) => {
                warn!(%peer, error = %err, "failed to cache resolved public key");
                key
            }
        }
    }
}
