//! Service layer: cached block store wrappers and their composition

mod bloom_cached;
mod cached;
mod two_queue_cached;

pub use bloom_cached::BloomCachedBlockstore;
pub use cached::{cached_blockstore, cached_blockstore_with_metrics};
pub use two_queue_cached::TwoQueueCachedBlockstore;
