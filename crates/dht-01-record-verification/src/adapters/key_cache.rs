//! In-memory peer key cache.

use std::collections::HashMap;

use parking_lot::RwLock;
use shared_crypto::PublicKey;
use shared_types::PeerId;

use crate::domain::errors::KeyCacheError;
use crate::ports::outbound::KeyCache;

/// Append-only `PeerId -> PublicKey` map.
///
/// The first key stored for a peer stays for the life of the process.
/// Re-storing that same key succeeds; storing a different one is a
/// [`KeyCacheError::Conflict`] and leaves the entry untouched.
#[derive(Debug, Default)]
pub struct InMemoryKeyCache {
    keys: RwLock<HashMap<PeerId, PublicKey>>,
}

impl InMemoryKeyCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

impl KeyCache for InMemoryKeyCache {
    fn lookup(&self, peer: &PeerId) -> Option<PublicKey> {
        self.keys.read().get(peer).copied()
    }

    fn store(&self, peer: PeerId, key: PublicKey) -> Result<(), KeyCacheError> {
        let mut keys = self.keys.write();
        match keys.get(&peer) {
            Some(existing) if *existing == key => Ok(()),
            Some(_) => Err(KeyCacheError::Conflict { peer }),
            None => {
                keys.insert(peer, key);
                Ok(())
            }
        }
    }
}
