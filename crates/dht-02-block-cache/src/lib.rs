//! # Block Cache
//!
//! Caching layers for a content-addressed block store.
//!
//! ## Architecture
//!
//! ```text
//!   caller
//!     │ has / get / put
//!     ▼
//!   BloomCachedBlockstore      definitely-absent answers, no I/O
//!     ▼
//!   TwoQueueCachedBlockstore   recent existence answers
//!     ▼
//!   Blockstore                 the real store
//! ```
//!
//! Both layers are optional. [`cached_blockstore`] validates [`CacheOpts`]
//! and stacks whichever layers are enabled; a non-zero bloom size with a
//! zero hash count is rejected up front.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use dht_02_block_cache::{cached_blockstore, Blockstore, CacheOpts, InMemoryBlockstore};
//! use shared_types::Block;
//!
//! let store = cached_blockstore(Arc::new(InMemoryBlockstore::new()), CacheOpts::default())?;
//! let block = Block::new(b"data".to_vec());
//! store.put(block.clone())?;
//! assert!(store.has(&block.cid())?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::InMemoryBlockstore;
pub use domain::{BloomFilter, CacheOpts, CacheOptsBuilder, TwoQueueCache};
pub use error::{BlockstoreError, CacheError};
pub use metrics::{CacheMetrics, CacheMetricsSnapshot};
pub use ports::Blockstore;
pub use service::{
    cached_blockstore, cached_blockstore_with_metrics, BloomCachedBlockstore,
    TwoQueueCachedBlockstore,
};
