//! Cache composition

use std::sync::Arc;

use shared_types::{Block, Cid};
use tracing::info;

use super::{BloomCachedBlockstore, TwoQueueCachedBlockstore};
use crate::domain::CacheOpts;
use crate::error::{BlockstoreError, CacheError};
use crate::metrics::CacheMetrics;
use crate::ports::Blockstore;

/// Wrap `store` in the caches `opts` enables.
///
/// The two-queue cache sits directly on the store, the bloom filter on top
/// of it. With both layers disabled the store comes back unwrapped.
pub fn cached_blockstore(
    store: Arc<dyn Blockstore>,
    opts: CacheOpts,
) -> Result<Arc<dyn Blockstore>, CacheError> {
    compose(store, opts, None)
}

/// Like [`cached_blockstore`], recording hits and misses into `metrics`
pub fn cached_blockstore_with_metrics(
    store: Arc<dyn Blockstore>,
    opts: CacheOpts,
    metrics: Arc<CacheMetrics>,
) -> Result<Arc<dyn Blockstore>, CacheError> {
    compose(store, opts, Some(metrics))
}

fn compose(
    store: Arc<dyn Blockstore>,
    opts: CacheOpts,
    metrics: Option<Arc<CacheMetrics>>,
) -> Result<Arc<dyn Blockstore>, CacheError> {
    opts.validate()?;

    let counted = metrics.is_some();
    let metrics = metrics.unwrap_or_default();
    let mut cached = store;

    if opts.two_queue_enabled() {
        cached = Arc::new(TwoQueueCachedBlockstore::new(
            cached,
            opts.has_two_queue_cache_size,
            Arc::clone(&metrics),
        )?);
    }

    if let Some(size_bits) = opts.bloom_filter_bits() {
        cached = Arc::new(BloomCachedBlockstore::new(
            cached,
            size_bits,
            opts.has_bloom_filter_hashes,
            Arc::clone(&metrics),
        )?);
    }

    info!(
        two_queue_size = opts.has_two_queue_cache_size,
        bloom_size_bytes = opts.has_bloom_filter_size,
        bloom_hashes = opts.has_bloom_filter_hashes,
        "block store caching configured"
    );

    if counted {
        cached = Arc::new(CountedBlockstore {
            inner: cached,
            metrics,
        });
    }
    Ok(cached)
}

/// Outermost layer counting `has` calls
struct CountedBlockstore {
    inner: Arc<dyn Blockstore>,
    metrics: Arc<CacheMetrics>,
}

impl Blockstore for CountedBlockstore {
    fn has(&self, cid: &Cid) -> Result<bool, BlockstoreError> {
        self.metrics.record_has_call();
        self.inner.has(cid)
    }

    fn get(&self, cid: &Cid) -> Result<Block, BlockstoreError> {
        self.inner.get(cid)
    }

    fn get_size(&self, cid: &Cid) -> Result<usize, BlockstoreError> {
        self.inner.get_size(cid)
    }

    fn put(&self, block: Block) -> Result<(), BlockstoreError> {
        self.inner.put(block)
    }

    fn put_many(&self, blocks: Vec<Block>) -> Result<(), BlockstoreError> {
        self.inner.put_many(blocks)
    }

    fn delete_block(&self, cid: &Cid) -> Result<(), BlockstoreError> {
        self.inner.delete_block(cid)
    }

    fn all_keys(&self) -> Result<Vec<Cid>, BlockstoreError> {
        self.inner.all_keys()
    }
}
