//! Domain layer: cache structures and options

pub mod bloom_filter;
pub mod config;
pub mod hash_functions;
pub mod two_queue;

pub use bloom_filter::BloomFilter;
pub use config::{CacheOpts, CacheOptsBuilder};
pub use two_queue::TwoQueueCache;
