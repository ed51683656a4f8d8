//! # Key Substitution Attack
//!
//! A malicious peer asked for its key answers with a key it controls but
//! whose identity differs, hoping the node caches it under the peer's id.
//! A forged record signed with that key would then verify.
//!
//! ## Defense
//!
//! Keys from a peer are accepted only if they derive to the id that was
//! asked for. Mismatches are dropped, counted, and resolution falls through
//! to the DHT, whose `/pk/` records are self-certifying.

#[cfg(test)]
mod tests {
    use dht_01_record_verification::test_utils::{ScriptedDht, ScriptedPeerQuery};
    use dht_01_record_verification::{
        record_signing_blob, FailedCheck, KeyCache, OperationContext, RecordVerificationApi,
        ResolutionError, VerificationMode,
    };
    use shared_crypto::Keypair;
    use shared_types::Record;

    use crate::fixtures::{value_record, Node};

    #[tokio::test]
    async fn test_substituted_key_never_cached() {
        let victim = Keypair::generate_ed25519();
        let attacker = Keypair::generate_ed25519();

        let node = Node::new(
            ScriptedPeerQuery::new()
                .respond(victim.peer_id(), Ok(Some(attacker.public().marshal()))),
            ScriptedDht::new().publishing(&victim.public()),
        );
        let ctx = OperationContext::background();

        let key = node
            .service
            .resolve_public_key(&ctx, &victim.peer_id())
            .await
            .unwrap();

        assert_eq!(key, victim.public());
        assert_eq!(node.cache.lookup(&victim.peer_id()), Some(victim.public()));
        assert_eq!(node.service.metrics().snapshot().identity_mismatches, 1);

        // a record forged in the victim's name with the attacker's key
        let unsigned = Record::new(b"/v/owner".to_vec(), b"attacker".to_vec(), victim.peer_id());
        let signature = attacker.sign(&record_signing_blob(&unsigned));
        let forged = unsigned.with_signature(signature);

        let err = node
            .service
            .verify(&ctx, &forged, VerificationMode::Offline)
            .await
            .unwrap_err();
        assert_eq!(err.failed_check(), FailedCheck::Signature);
    }

    #[tokio::test]
    async fn test_substitution_without_dht_fallback_leaves_author_unresolved() {
        let victim = Keypair::generate_secp256k1();
        let attacker = Keypair::generate_secp256k1();
        let node = Node::new(
            ScriptedPeerQuery::new()
                .respond(victim.peer_id(), Ok(Some(attacker.public().marshal()))),
            ScriptedDht::new(),
        );

        let err = node
            .service
            .verify(
                &OperationContext::background(),
                &value_record(&victim, "k", b"v"),
                VerificationMode::Online,
            )
            .await
            .unwrap_err();

        assert_eq!(err.failed_check(), FailedCheck::Resolution);
        assert!(matches!(
            err.identity_mismatch(),
            Some(ResolutionError::IdentityMismatch { expected, .. }) if *expected == victim.peer_id()
        ));
        assert!(node.cache.is_empty());
    }
}
