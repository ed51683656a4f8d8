//! # Record Verification Service
//!
//! Implements [`RecordVerificationApi`].
//!
//! ```text
//! Start ─┬─ unsigned ─────────────────────────────────────┬─ StructuralCheck ─┬─ Pass
//!        └─ signed ─ ResolveKey ─┬─ resolved ─ Signature ─┘                   └─ Fail
//!                                └─ unresolved ─ Fail
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use shared_crypto::PublicKey;
use shared_types::{PeerId, Record};
use tracing::{debug, info_span, Instrument};

use crate::domain::config::{ConfigError, VerifierConfig};
use crate::domain::context::OperationContext;
use crate::domain::entities::VerificationMode;
use crate::domain::errors::VerificationError;
use crate::metrics::VerificationMetrics;
use crate::ports::inbound::RecordVerificationApi;
use crate::ports::outbound::{
    ConfigProvider, DhtValueLookup, KeyCache, PeerKeyQuery, RecordValidator, SignatureChecker,
};
use crate::service::resolver::PeerKeyResolver;

/// Capabilities the service is wired to.
#[derive(Clone)]
pub struct VerifierDependencies {
    /// Shared peer key cache
    pub key_cache: Arc<dyn KeyCache>,
    /// Single-peer key exchange
    pub peer_query: Arc<dyn PeerKeyQuery>,
    /// Generic DHT lookup
    pub dht: Arc<dyn DhtValueLookup>,
    /// Structural validator
    pub validator: Arc<dyn RecordValidator>,
    /// Signature checker
    pub signatures: Arc<dyn SignatureChecker>,
}

/// Record verification service.
pub struct RecordVerificationService {
    resolver: PeerKeyResolver,
    validator: Arc<dyn RecordValidator>,
    signatures: Arc<dyn SignatureChecker>,
    config: VerifierConfig,
    metrics: Arc<VerificationMetrics>,
}

impl RecordVerificationService {
    /// Wire a service from its dependencies.
    pub fn new(deps: VerifierDependencies, config: VerifierConfig) -> Self {
        let metrics = Arc::new(VerificationMetrics::new());
        let resolver = PeerKeyResolver::new(deps.key_cache, deps.peer_query, deps.dht, &config)
            .with_metrics(Arc::clone(&metrics));

        Self {
            resolver,
            validator: deps.validator,
            signatures: deps.signatures,
            config,
            metrics,
        }
    }

    /// Wire a service, loading configuration from `provider`.
    pub fn from_provider(
        deps: VerifierDependencies,
        provider: &dyn ConfigProvider,
    ) -> Result<Self, ConfigError> {
        let config = provider.load()?;
        config.validate()?;
        Ok(Self::new(deps, config))
    }

    /// Active configuration.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Counters for this service.
    pub fn metrics(&self) -> &VerificationMetrics {
        &self.metrics
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &PeerKeyResolver {
        &self.resolver
    }

    async fn check_record(
        &self,
        ctx: &OperationContext,
        record: &Record,
        mode: VerificationMode,
    ) -> Result<(), VerificationError> {
        if record.is_signed() {
            let key = self
                .resolver
                .resolve(ctx, &record.author, mode)
                .await
                .inspect_err(|err| {
                    if mode == VerificationMode::Offline
                        && matches!(err, VerificationError::KeyNotFound { .. })
                    {
                        self.metrics.record_offline_miss();
                    }
                })?;

            self.signatures
                .check_signature(record, &key)
                .map_err(|reason| VerificationError::SignatureInvalid {
                    author: record.author,
                    reason,
                })?;
        }

        self.validator.verify_structure(record)?;
        Ok(())
    }
}

#[async_trait]
impl RecordVerificationApi for RecordVerificationService {
    async fn verify(
        &self,
        ctx: &OperationContext,
        record: &Record,
        mode: VerificationMode,
    ) -> Result<(), VerificationError> {
        let span = info_span!(
            "verify_record",
            author = %record.author,
            mode = %mode,
            signed = record.is_signed()
        );

        let result = self
            .check_record(ctx, record, mode)
            .instrument(span.clone())
            .await;

        match &result {
            Ok(()) => self.metrics.record_passed(),
            Err(err) => {
                let check = err.failed_check();
                self.metrics.record_failed(check);
                span.in_scope(|| debug!(%check, error = %err, "record rejected"));
            }
        }
        result
    }

    async fn resolve_public_key(
        &self,
        ctx: &OperationContext,
        peer: &PeerId,
    ) -> Result<PublicKey, VerificationError> {
        self.resolver
            .resolve(ctx, peer, VerificationMode::Online)
            .await
    }
}
