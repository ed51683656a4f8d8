//! # Verification Flows
//!
//! A node meets records from unknown authors, resolves their keys online,
//! and afterwards verifies the same authors offline from its cache.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use dht_01_record_verification::test_utils::{ScriptedDht, ScriptedPeerQuery};
    use dht_01_record_verification::{
        public_key_lookup_key, sign_record, FailedCheck, FreshnessValidator, NamespacedValidator,
        OperationContext, RecordFreshnessPolicy, RecordVerificationApi, ResolutionError,
        ResolutionTier, TimeSource, ValidationError, VerificationError, VerificationMode,
        VerifierConfigBuilder,
    };
    use shared_crypto::Keypair;
    use shared_types::{PeerId, Record};

    use crate::fixtures::{public_key_record, value_record, Node, OpenNamespace};

    struct FixedClock(u64);

    impl TimeSource for FixedClock {
        fn now(&self) -> u64 {
            self.0
        }
    }

    // =========================================================================
    // Online then offline
    // =========================================================================

    #[tokio::test]
    async fn test_online_resolution_enables_offline_verification() {
        let author = Keypair::generate_ed25519();
        let node = Node::new(
            ScriptedPeerQuery::new().serving(&author.public()),
            ScriptedDht::new(),
        );
        let ctx = OperationContext::background().with_timeout(Duration::from_secs(10));
        let record = value_record(&author, "greeting", b"hello");

        let offline = node
            .service
            .verify(&ctx, &record, VerificationMode::Offline)
            .await
            .unwrap_err();
        assert_eq!(offline.failed_check(), FailedCheck::Resolution);
        assert_eq!(node.network_calls(), 0);

        node.service
            .verify(&ctx, &record, VerificationMode::Online)
            .await
            .unwrap();
        assert_eq!(node.peers.calls(), 1);
        assert_eq!(node.cache.len(), 1);

        let later = value_record(&author, "greeting", b"hello again");
        node.service
            .verify(&ctx, &later, VerificationMode::Offline)
            .await
            .unwrap();
        assert_eq!(node.network_calls(), 1);

        let snapshot = node.service.metrics().snapshot();
        assert_eq!(snapshot.verifications_passed, 2);
        assert_eq!(snapshot.resolved_from_peer, 1);
        assert_eq!(snapshot.resolved_from_cache, 1);
        assert_eq!(snapshot.offline_key_misses, 1);
    }

    #[tokio::test]
    async fn test_unreachable_author_resolved_through_dht() {
        let author = Keypair::generate_secp256k1();
        let node = Node::new(ScriptedPeerQuery::new(), ScriptedDht::new().publishing(&author.public()));

        let key = node
            .service
            .resolve_public_key(&OperationContext::background(), &author.peer_id())
            .await
            .unwrap();

        assert_eq!(key, author.public());
        assert_eq!(
            node.dht.requested_keys(),
            vec![public_key_lookup_key(&author.peer_id())]
        );
        assert_eq!(node.service.metrics().snapshot().resolved_from_dht, 1);
    }

    #[tokio::test]
    async fn test_nothing_anywhere_reports_each_tier() {
        let author = Keypair::generate_ed25519();
        let node = Node::new(ScriptedPeerQuery::new(), ScriptedDht::new());

        let err = node
            .service
            .verify(
                &OperationContext::background(),
                &value_record(&author, "k", b"v"),
                VerificationMode::Online,
            )
            .await
            .unwrap_err();

        match &err {
            VerificationError::KeyNotFound { peer, failures, .. } => {
                assert_eq!(peer, &author.peer_id());
                let tiers: Vec<_> = failures.iter().map(|f| f.tier).collect();
                assert_eq!(
                    tiers,
                    vec![
                        ResolutionTier::LocalCache,
                        ResolutionTier::DirectPeer,
                        ResolutionTier::DhtLookup
                    ]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.cause(), Some(&ResolutionError::NoRecord));
    }

    // =========================================================================
    // Public-key records
    // =========================================================================

    #[tokio::test]
    async fn test_self_certifying_public_key_record() {
        let author = Keypair::generate_ed25519();
        let node = Node::new(
            ScriptedPeerQuery::new(),
            ScriptedDht::new().publishing(&author.public()),
        );

        node.service
            .verify(
                &OperationContext::background(),
                &public_key_record(&author),
                VerificationMode::Online,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_public_key_record_for_someone_else_rejected() {
        let author = Keypair::generate_ed25519();
        let victim = Keypair::generate_ed25519();
        let node = Node::new(
            ScriptedPeerQuery::new().serving(&author.public()),
            ScriptedDht::new(),
        );

        // correctly signed by author, but claims author's key belongs to victim
        let forged = sign_record(
            &author,
            Record::new(
                public_key_lookup_key(&victim.peer_id()),
                author.public().marshal(),
                PeerId::new([0; 32]),
            ),
        );

        let err = node
            .service
            .verify(&OperationContext::background(), &forged, VerificationMode::Online)
            .await
            .unwrap_err();

        assert_eq!(err.failed_check(), FailedCheck::Structure);
        assert!(matches!(
            err,
            VerificationError::StructuralInvalid(ValidationError::KeyIdMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_namespace_rejected_after_signature() {
        let author = Keypair::generate_ed25519();
        let node = Node::new(
            ScriptedPeerQuery::new().serving(&author.public()),
            ScriptedDht::new(),
        );
        let record = sign_record(
            &author,
            Record::new(b"/ipns/name".to_vec(), b"v".to_vec(), PeerId::new([0; 32])),
        );

        let err = node
            .service
            .verify(&OperationContext::background(), &record, VerificationMode::Online)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            VerificationError::StructuralInvalid(ValidationError::UnknownNamespace(
                "ipns".into()
            ))
        );
    }

    #[tokio::test]
    async fn test_tampered_value_fails_signature() {
        let author = Keypair::generate_secp256k1();
        let node = Node::new(
            ScriptedPeerQuery::new().serving(&author.public()),
            ScriptedDht::new(),
        );
        let mut record = value_record(&author, "balance", b"10");
        record.value = b"1000000".to_vec();

        let err = node
            .service
            .verify(&OperationContext::background(), &record, VerificationMode::Online)
            .await
            .unwrap_err();

        assert_eq!(err.failed_check(), FailedCheck::Signature);
        assert_eq!(node.service.metrics().snapshot().signature_failures, 1);
    }

    // =========================================================================
    // Retention
    // =========================================================================

    #[tokio::test]
    async fn test_freshness_validator_rejects_stale_records() {
        let author = Keypair::generate_ed25519();
        let now = 1_700_000_000;
        let config = VerifierConfigBuilder::new()
            .max_record_age(Duration::from_secs(3600))
            .build()
            .unwrap();
        let inner = NamespacedValidator::new().with_namespace("v", Arc::new(OpenNamespace));
        let validator = FreshnessValidator::new(
            Arc::new(inner),
            RecordFreshnessPolicy::from(&config),
            Arc::new(FixedClock(now)),
        );
        let node = Node::with_validator(
            ScriptedPeerQuery::new().serving(&author.public()),
            ScriptedDht::new(),
            Arc::new(validator),
            config,
        );
        let ctx = OperationContext::background();

        let fresh = value_record(&author, "k", b"v").received_at(now - 60);
        node.service
            .verify(&ctx, &fresh, VerificationMode::Online)
            .await
            .unwrap();

        let stale = value_record(&author, "k", b"v").received_at(now - 2 * 3600);
        let err = node
            .service
            .verify(&ctx, &stale, VerificationMode::Offline)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VerificationError::StructuralInvalid(ValidationError::Expired { .. })
        ));
    }

    // =========================================================================
    // Concurrency
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_authors_verified_concurrently() {
        let authors: Vec<Keypair> = (0..12)
            .map(|i| {
                if i % 2 == 0 {
                    Keypair::generate_ed25519()
                } else {
                    Keypair::generate_secp256k1()
                }
            })
            .collect();

        let mut peers = ScriptedPeerQuery::new();
        let mut dht = ScriptedDht::new();
        for (i, author) in authors.iter().enumerate() {
            // half answer directly, half only via the DHT
            if i % 3 == 0 {
                dht = dht.publishing(&author.public());
            } else {
                peers = peers.serving(&author.public());
            }
        }
        let node = Arc::new(Node::new(peers, dht));

        let tasks: Vec<_> = authors
            .iter()
            .flat_map(|author| {
                (0..3).map(move |n| value_record(author, &format!("item-{}", n), b"data"))
            })
            .map(|record| {
                let node = Arc::clone(&node);
                tokio::spawn(async move {
                    node.service
                        .verify(
                            &OperationContext::background().with_timeout(Duration::from_secs(5)),
                            &record,
                            VerificationMode::Online,
                        )
                        .await
                })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        assert_eq!(node.cache.len(), authors.len());
        assert_eq!(
            node.service.metrics().snapshot().verifications_passed,
            (authors.len() * 3) as u64
        );
    }
}
