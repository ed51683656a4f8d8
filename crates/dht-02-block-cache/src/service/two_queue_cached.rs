//! Block store wrapper caching existence answers in a 2Q cache

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use shared_types::{Block, Cid};
use tracing::trace;

use crate::domain::TwoQueueCache;
use crate::error::{BlockstoreError, CacheError};
use crate::metrics::CacheMetrics;
use crate::ports::Blockstore;

/// Per-cid write locks, striped by the cid's first byte
const LOCK_STRIPES: usize = 64;

/// Remembers whether each recently touched cid is present.
///
/// A cached `false` answers `has`, `get` and `get_size` without reaching the
/// inner store. A cached `true` answers `has` and makes repeated `put`s of
/// the same block free.
///
/// Every path that reads the inner store and then records an answer holds
/// the cid's stripe lock across both steps, so a racing `put` and
/// `delete_block` on one cid leave the cache agreeing with the store.
pub struct TwoQueueCachedBlockstore {
    inner: Arc<dyn Blockstore>,
    cache: Mutex<TwoQueueCache<Cid, bool>>,
    stripes: Box<[Mutex<()>]>,
    metrics: Arc<CacheMetrics>,
}

impl TwoQueueCachedBlockstore {
    pub fn new(
        inner: Arc<dyn Blockstore>,
        capacity: usize,
        metrics: Arc<CacheMetrics>,
    ) -> Result<Self, CacheError> {
        Ok(Self {
            inner,
            cache: Mutex::new(TwoQueueCache::new(capacity)?),
            stripes: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
            metrics,
        })
    }

    /// Number of cids with a cached answer
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }

    fn stripe_index(cid: &Cid) -> usize {
        usize::from(cid.as_bytes()[0]) % LOCK_STRIPES
    }

    fn lock_cid(&self, cid: &Cid) -> MutexGuard<'_, ()> {
        self.stripes[Self::stripe_index(cid)].lock()
    }

    /// Lock every stripe `cids` touch, in index order.
    fn lock_cids<'a>(&self, cids: impl IntoIterator<Item = &'a Cid>) -> Vec<MutexGuard<'_, ()>> {
        let mut indices: Vec<usize> = cids.into_iter().map(Self::stripe_index).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
            .into_iter()
            .map(|index| self.stripes[index].lock())
            .collect()
    }

    fn cached(&self, cid: &Cid) -> Option<bool> {
        let answer = self.cache.lock().get(cid).copied();
        match answer {
            Some(_) => self.metrics.record_two_queue_hit(),
            None => self.metrics.record_two_queue_miss(),
        }
        answer
    }

    fn remember(&self, cid: Cid, present: bool) {
        self.cache.lock().put(cid, present);
    }

    fn remember_outcome<T>(&self, cid: &Cid, outcome: &Result<T, BlockstoreError>) {
        match outcome {
            Ok(_) => self.remember(*cid, true),
            Err(BlockstoreError::NotFound(_)) => self.remember(*cid, false),
            // backend failures say nothing about presence
            Err(_) => {}
        }
    }
}

impl Blockstore for TwoQueueCachedBlockstore {
    fn has(&self, cid: &Cid) -> Result<bool, BlockstoreError> {
        if let Some(present) = self.cached(cid) {
            trace!(%cid, present, "two-queue answered has");
            return Ok(present);
        }

        let _guard = self.lock_cid(cid);
        let present = self.inner.has(cid)?;
        self.remember(*cid, present);
        Ok(present)
    }

    fn get(&self, cid: &Cid) -> Result<Block, BlockstoreError> {
        if self.cached(cid) == Some(false) {
            return Err(BlockstoreError::NotFound(*cid));
        }

        let _guard = self.lock_cid(cid);
        let outcome = self.inner.get(cid);
        self.remember_outcome(cid, &outcome);
        outcome
    }

    fn get_size(&self, cid: &Cid) -> Result<usize, BlockstoreError> {
        if self.cached(cid) == Some(false) {
            return Err(BlockstoreError::NotFound(*cid));
        }

        let _guard = self.lock_cid(cid);
        let outcome = self.inner.get_size(cid);
        self.remember_outcome(cid, &outcome);
        outcome
    }

    fn put(&self, block: Block) -> Result<(), BlockstoreError> {
        let cid = block.cid();
        let _guard = self.lock_cid(&cid);
        if self.cached(&cid) == Some(true) {
            return Ok(());
        }

        self.inner.put(block)?;
        self.remember(cid, true);
        Ok(())
    }

    fn put_many(&self, blocks: Vec<Block>) -> Result<(), BlockstoreError> {
        let all_cids: Vec<Cid> = blocks.iter().map(Block::cid).collect();
        let _guards = self.lock_cids(&all_cids);

        let (fresh, cids): (Vec<Block>, Vec<Cid>) = blocks
            .into_iter()
            .zip(all_cids.iter().copied())
            .filter(|(_, cid)| self.cached(cid) != Some(true))
            .unzip();
        if fresh.is_empty() {
            return Ok(());
        }

        self.inner.put_many(fresh)?;
        for cid in cids {
            self.remember(cid, true);
        }
        Ok(())
    }

    fn delete_block(&self, cid: &Cid) -> Result<(), BlockstoreError> {
        let _guard = self.lock_cid(cid);
        self.inner.delete_block(cid)?;
        self.remember(*cid, false);
        Ok(())
    }

    fn all_keys(&self) -> Result<Vec<Cid>, BlockstoreError> {
        self.inner.all_keys()
    }
}
