//! # Amplification Attack
//!
//! An attacker floods a node with records signed by freshly generated
//! identities. Each unknown author could cost the node a peer query plus a
//! DHT walk, so verifying inbound traffic online turns cheap attacker
//! packets into expensive node work.
//!
//! ## Defense
//!
//! Inbound records are verified offline: unknown authors fail against the
//! local cache with no network traffic at all.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dht_01_record_verification::test_utils::{ScriptedDht, ScriptedPeerQuery};
    use dht_01_record_verification::{
        FailedCheck, OperationContext, RecordVerificationApi, VerificationMode,
    };
    use shared_crypto::Keypair;

    use crate::fixtures::{value_record, Node};

    const FLOOD: usize = 200;

    #[tokio::test]
    async fn test_offline_flood_generates_no_traffic() {
        let attackers: Vec<Keypair> = (0..FLOOD).map(|_| Keypair::generate_ed25519()).collect();

        let mut peers = ScriptedPeerQuery::new();
        let mut dht = ScriptedDht::new();
        for attacker in &attackers {
            // attackers happily answer, if only anyone asked
            peers = peers.serving(&attacker.public());
            dht = dht.publishing(&attacker.public());
        }
        let node = Node::new(peers, dht);
        let ctx = OperationContext::background().with_timeout(Duration::from_secs(30));

        for (i, attacker) in attackers.iter().enumerate() {
            let record = value_record(attacker, &format!("spam-{}", i), &[0xFF; 256]);
            let err = node
                .service
                .verify(&ctx, &record, VerificationMode::Offline)
                .await
                .unwrap_err();
            assert_eq!(err.failed_check(), FailedCheck::Resolution);
        }

        assert_eq!(node.network_calls(), 0);
        assert!(node.cache.is_empty(), "flood must not grow the key cache");

        let snapshot = node.service.metrics().snapshot();
        assert_eq!(snapshot.offline_key_misses, FLOOD as u64);
        assert_eq!(snapshot.network_resolutions(), 0);
    }

    #[tokio::test]
    async fn test_known_authors_unaffected_by_flood() {
        let honest = Keypair::generate_secp256k1();
        let node = Node::new(
            ScriptedPeerQuery::new().serving(&honest.public()),
            ScriptedDht::new(),
        );
        let ctx = OperationContext::background();

        node.service
            .resolve_public_key(&ctx, &honest.peer_id())
            .await
            .unwrap();
        let baseline = node.network_calls();

        for i in 0..50 {
            let attacker = Keypair::generate_ed25519();
            let _ = node
                .service
                .verify(&ctx, &value_record(&attacker, "x", b"y"), VerificationMode::Offline)
                .await;

            node.service
                .verify(
                    &ctx,
                    &value_record(&honest, &format!("ok-{}", i), b"payload"),
                    VerificationMode::Offline,
                )
                .await
                .unwrap();
        }

        assert_eq!(node.network_calls(), baseline);
        assert_eq!(node.service.metrics().snapshot().verifications_passed, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_online_lookups_bounded_by_caller_deadline() {
        // a stalling network cannot hold verification past the caller's deadline
        let attacker = Keypair::generate_ed25519();
        let node = Node::new(ScriptedPeerQuery::new().hanging(), ScriptedDht::new().hanging());

        let start = tokio::time::Instant::now();
        let ctx = OperationContext::background().with_timeout(Duration::from_secs(2));
        let err = node
            .service
            .verify(&ctx, &value_record(&attacker, "slow", b"v"), VerificationMode::Online)
            .await
            .unwrap_err();

        assert_eq!(err.failed_check(), FailedCheck::Context);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert_eq!(node.dht.completed(), 0);
    }
}
