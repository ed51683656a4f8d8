//! Block store wrapper short-circuiting negative lookups with a bloom filter
//!
//! INVARIANTS:
//! - While active, every stored cid is in the filter (no false negatives)
//! - While inactive, every call passes through to the inner store

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{Block, Cid};
use tracing::{debug, info};

use crate::domain::BloomFilter;
use crate::error::{BlockstoreError, CacheError};
use crate::metrics::CacheMetrics;
use crate::ports::Blockstore;

/// Bloom-filtered block store.
///
/// Deleted blocks keep their bits set, so deletes only cost accuracy until
/// the next [`rebuild`](Self::rebuild).
pub struct BloomCachedBlockstore {
    inner: Arc<dyn Blockstore>,
    filter: RwLock<BloomFilter>,
    active: AtomicBool,
    metrics: Arc<CacheMetrics>,
}

impl BloomCachedBlockstore {
    /// Wrap `inner` and build the filter from its current keys
    pub fn new(
        inner: Arc<dyn Blockstore>,
        size_bits: usize,
        hash_count: usize,
        metrics: Arc<CacheMetrics>,
    ) -> Result<Self, CacheError> {
        let store = Self::deferred(inner, size_bits, hash_count, metrics)?;
        store.rebuild()?;
        Ok(store)
    }

    /// Wrap `inner` without building; lookups pass through until `rebuild`
    pub fn deferred(
        inner: Arc<dyn Blockstore>,
        size_bits: usize,
        hash_count: usize,
        metrics: Arc<CacheMetrics>,
    ) -> Result<Self, CacheError> {
        if size_bits == 0 {
            return Err(CacheError::InvalidConfig(
                "bloom filter size must be positive".to_string(),
            ));
        }
        if hash_count == 0 {
            return Err(CacheError::InvalidConfig(
                "bloom filter hash count can't be 0 when there is size set".to_string(),
            ));
        }

        Ok(Self {
            inner,
            filter: RwLock::new(BloomFilter::new(size_bits, hash_count)),
            active: AtomicBool::new(false),
            metrics,
        })
    }

    /// Refill the filter from the inner store's keys and activate it
    pub fn rebuild(&self) -> Result<(), CacheError> {
        // puts insert under this lock, so none can slip between the key
        // listing and the swap
        let mut filter = self.filter.write();
        let keys = self.inner.all_keys()?;

        let mut fresh = BloomFilter::new(filter.size_bits(), filter.hash_count());
        for cid in &keys {
            fresh.insert(cid.as_bytes());
        }
        *filter = fresh;
        self.active.store(true, Ordering::Release);

        info!(
            blocks = keys.len(),
            size_bits = filter.size_bits(),
            hash_count = filter.hash_count(),
            "bloom filter built"
        );
        Ok(())
    }

    /// Whether the filter has been built
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Expected false positive rate of the current filter
    pub fn false_positive_rate(&self) -> f64 {
        self.filter.read().false_positive_rate()
    }

    /// True only when an active filter proves the block is absent
    fn known_absent(&self, cid: &Cid) -> bool {
        if !self.is_active() {
            return false;
        }

        if self.filter.read().contains(cid.as_bytes()) {
            self.metrics.record_bloom_miss();
            false
        } else {
            self.metrics.record_bloom_hit();
            debug!(%cid, "bloom filter ruled out block");
            true
        }
    }

    fn add(&self, cid: &Cid) {
        self.filter.write().insert(cid.as_bytes());
    }
}

impl Blockstore for BloomCachedBlockstore {
    fn has(&self, cid: &Cid) -> Result<bool, BlockstoreError> {
        if self.known_absent(cid) {
            return Ok(false);
        }
        self.inner.has(cid)
    }

    fn get(&self, cid: &Cid) -> Result<Block, BlockstoreError> {
        if self.known_absent(cid) {
            return Err(BlockstoreError::NotFound(*cid));
        }
        self.inner.get(cid)
    }

    fn get_size(&self, cid: &Cid) -> Result<usize, BlockstoreError> {
        if self.known_absent(cid) {
            return Err(BlockstoreError::NotFound(*cid));
        }
        self.inner.get_size(cid)
    }

    fn put(&self, block: Block) -> Result<(), BlockstoreError> {
        let cid = block.cid();
        self.inner.put(block)?;
        self.add(&cid);
        Ok(())
    }

    fn put_many(&self, blocks: Vec<Block>) -> Result<(), BlockstoreError> {
        let cids: Vec<Cid> = blocks.iter().map(Block::cid).collect();
        self.inner.put_many(blocks)?;

        let mut filter = self.filter.write();
        for cid in &cids {
            filter.insert(cid.as_bytes());
        }
        Ok(())
    }

    fn delete_block(&self, cid: &Cid) -> Result<(), BlockstoreError> {
        self.inner.delete_block(cid)
    }

    fn all_keys(&self) -> Result<Vec<Cid>, BlockstoreError> {
        self.inner.all_keys()
    }
}
