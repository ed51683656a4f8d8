//! Verifier wiring with real validators and scripted network fakes.

use std::sync::Arc;

use dht_01_record_verification::test_utils::{ScriptedDht, ScriptedPeerQuery};
use dht_01_record_verification::{
    public_key_lookup_key, sign_record, InMemoryKeyCache, NamespacedValidator,
    RecordSignatureChecker, RecordValidator, RecordVerificationService, ValidationError,
    VerifierConfig, VerifierDependencies,
};
use dht_telemetry::{init_logging, TelemetryConfig};
use shared_crypto::Keypair;
use shared_types::{PeerId, Record};

/// Accepts anything under its namespace.
pub struct OpenNamespace;

impl RecordValidator for OpenNamespace {
    fn verify_structure(&self, _record: &Record) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// One verifying node and handles on its collaborators.
pub struct Node {
    pub service: RecordVerificationService,
    pub cache: Arc<InMemoryKeyCache>,
    pub peers: Arc<ScriptedPeerQuery>,
    pub dht: Arc<ScriptedDht>,
}

impl Node {
    /// Node validating `/pk/` and `/v/` records.
    pub fn new(peers: ScriptedPeerQuery, dht: ScriptedDht) -> Self {
        Self::with_config(peers, dht, VerifierConfig::default())
    }

    pub fn with_config(peers: ScriptedPeerQuery, dht: ScriptedDht, config: VerifierConfig) -> Self {
        let validator = NamespacedValidator::with_public_keys()
            .with_namespace("v", Arc::new(OpenNamespace));
        Self::with_validator(peers, dht, Arc::new(validator), config)
    }

    pub fn with_validator(
        peers: ScriptedPeerQuery,
        dht: ScriptedDht,
        validator: Arc<dyn RecordValidator>,
        config: VerifierConfig,
    ) -> Self {
        init_test_logging();

        let cache = Arc::new(InMemoryKeyCache::new());
        let peers = Arc::new(peers);
        let dht = Arc::new(dht);
        let deps = VerifierDependencies {
            key_cache: cache.clone(),
            peer_query: peers.clone(),
            dht: dht.clone(),
            validator,
            signatures: Arc::new(RecordSignatureChecker::new()),
        };

        Self {
            service: RecordVerificationService::new(deps, config),
            cache,
            peers,
            dht,
        }
    }

    pub fn network_calls(&self) -> usize {
        self.peers.calls() + self.dht.calls()
    }
}

/// Install a subscriber once per test binary; later calls are no-ops.
pub fn init_test_logging() {
    let config = TelemetryConfig::from_env().with_log_level("warn");
    // dropping the guard keeps the subscriber installed
    let _ = init_logging(&config);
}

/// `/v/<name>` record signed by `author`.
pub fn value_record(author: &Keypair, name: &str, value: &[u8]) -> Record {
    sign_record(
        author,
        Record::new(format!("/v/{}", name).into_bytes(), value.to_vec(), PeerId::new([0; 32])),
    )
}

/// `/pk/<author id>` record carrying the author's own key, self-signed.
pub fn public_key_record(author: &Keypair) -> Record {
    sign_record(
        author,
        Record::new(
            public_key_lookup_key(&author.peer_id()),
            author.public().marshal(),
            author.peer_id(),
        ),
    )
}
