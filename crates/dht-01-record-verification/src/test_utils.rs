//! Scripted fakes for the outbound ports.
//!
//! Every fake counts its calls so tests can assert which tiers ran. Fakes
//! also record `ctx.remaining()` as seen on entry, which is how deadline
//! budgeting is observed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_crypto::PublicKey;
use shared_types::{PeerId, Record};

use crate::domain::context::OperationContext;
use crate::domain::errors::{NetworkError, ValidationError};
use crate::domain::keys::public_key_lookup_key;
use crate::ports::outbound::{DhtValueLookup, PeerKeyQuery, RecordValidator};

type PeerReply = Result<Option<Vec<u8>>, NetworkError>;

/// Call bookkeeping shared by the network fakes.
#[derive(Debug, Default)]
struct CallLog {
    calls: AtomicUsize,
    completed: AtomicUsize,
    budgets: Mutex<Vec<Option<Duration>>>,
}

impl CallLog {
    fn enter(&self, ctx: &OperationContext) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.budgets.lock().push(ctx.remaining());
    }

    fn finish(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

async fn stall(hang: bool, latency: Option<Duration>) {
    if hang {
        std::future::pending::<()>().await;
    }
    if let Some(latency) = latency {
        tokio::time::sleep(latency).await;
    }
}

// =============================================================================
// PEER QUERY
// =============================================================================

/// Fake single-peer key exchange.
///
/// Unscripted peers answer with the fallback (unreachable by default).
#[derive(Debug)]
pub struct ScriptedPeerQuery {
    replies: HashMap<PeerId, PeerReply>,
    fallback: PeerReply,
    latency: Option<Duration>,
    hang: bool,
    log: CallLog,
}

impl Default for ScriptedPeerQuery {
    fn default() -> Self {
        Self {
            replies: HashMap::new(),
            fallback: Err(NetworkError::Unreachable("unscripted peer".into())),
            latency: None,
            hang: false,
            log: CallLog::default(),
        }
    }
}

impl ScriptedPeerQuery {
    /// Every peer unreachable.
    pub fn new() -> Self {
        Self::default()
    }

    /// The owner of `key` answers honestly with it.
    pub fn serving(mut self, key: &PublicKey) -> Self {
        self.replies.insert(key.peer_id(), Ok(Some(key.marshal())));
        self
    }

    /// `peer` answers with `reply`.
    pub fn respond(mut self, peer: PeerId, reply: PeerReply) -> Self {
        self.replies.insert(peer, reply);
        self
    }

    /// Reply for peers without a script.
    pub fn with_fallback(mut self, reply: PeerReply) -> Self {
        self.fallback = reply;
        self
    }

    /// Delay every reply.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Never reply.
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Requests started.
    pub fn calls(&self) -> usize {
        self.log.calls.load(Ordering::SeqCst)
    }

    /// Requests that ran to completion.
    pub fn completed(&self) -> usize {
        self.log.completed.load(Ordering::SeqCst)
    }

    /// `ctx.remaining()` seen by each request.
    pub fn observed_budgets(&self) -> Vec<Option<Duration>> {
        self.log.budgets.lock().clone()
    }
}

#[async_trait]
impl PeerKeyQuery for ScriptedPeerQuery {
    async fn request_public_key(&self, ctx: &OperationContext, peer: &PeerId) -> PeerReply {
        self.log.enter(ctx);
        stall(self.hang, self.latency).await;
        self.log.finish();
        self.replies
            .get(peer)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

// =============================================================================
// DHT LOOKUP
// =============================================================================

/// Fake DHT holding a fixed value map. Missing keys are `NotFound`.
#[derive(Debug, Default)]
pub struct ScriptedDht {
    values: HashMap<Vec<u8>, Vec<u8>>,
    failure: Option<NetworkError>,
    latency: Option<Duration>,
    hang: bool,
    requested: Mutex<Vec<Vec<u8>>>,
    log: CallLog,
}

impl ScriptedDht {
    /// Empty DHT.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `key` under `/pk/<its own peer id>`.
    pub fn publishing(self, key: &PublicKey) -> Self {
        self.publishing_as(key.peer_id(), key)
    }

    /// Publish `key` under `/pk/<peer>`, whoever really owns it.
    pub fn publishing_as(mut self, peer: PeerId, key: &PublicKey) -> Self {
        self.values.insert(public_key_lookup_key(&peer), key.marshal());
        self
    }

    /// Store raw `value` under `key`.
    pub fn with_value(mut self, key: Vec<u8>, value: Vec<u8>) -> Self {
        self.values.insert(key, value);
        self
    }

    /// Fail every lookup with `err`.
    pub fn failing(mut self, err: NetworkError) -> Self {
        self.failure = Some(err);
        self
    }

    /// Delay every lookup.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Never answer.
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Lookups started.
    pub fn calls(&self) -> usize {
        self.log.calls.load(Ordering::SeqCst)
    }

    /// Lookups that ran to completion.
    pub fn completed(&self) -> usize {
        self.log.completed.load(Ordering::SeqCst)
    }

    /// `ctx.remaining()` seen by each lookup.
    pub fn observed_budgets(&self) -> Vec<Option<Duration>> {
        self.log.budgets.lock().clone()
    }

    /// Keys looked up, in order.
    pub fn requested_keys(&self) -> Vec<Vec<u8>> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl DhtValueLookup for ScriptedDht {
    async fn get_value(&self, ctx: &OperationContext, key: &[u8]) -> Result<Vec<u8>, NetworkError> {
        self.log.enter(ctx);
        self.requested.lock().push(key.to_vec());
        stall(self.hang, self.latency).await;
        self.log.finish();

        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.values.get(key).cloned().ok_or(NetworkError::NotFound)
    }
}

// =============================================================================
// VALIDATOR
// =============================================================================

/// Validator with a fixed verdict.
#[derive(Debug, Default)]
pub struct ScriptedValidator {
    verdict: Option<ValidationError>,
    calls: AtomicUsize,
}

impl ScriptedValidator {
    /// Accept everything.
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Reject everything with `err`.
    pub fn rejecting(err: ValidationError) -> Self {
        Self {
            verdict: Some(err),
            calls: AtomicUsize::new(0),
        }
    }

    /// Records checked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RecordValidator for ScriptedValidator {
    fn verify_structure(&self, _record: &Record) -> Result<(), ValidationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.verdict {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
