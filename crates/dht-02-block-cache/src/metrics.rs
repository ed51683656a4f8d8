//! Cache hit/miss counters
//!
//! Lock-free counters shared by the cache layers of one composed store.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hit/miss counters for the bloom and two-queue layers
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Lookups the bloom filter answered as definitely absent
    bloom_hits: AtomicU64,
    /// Lookups the bloom filter let through
    bloom_misses: AtomicU64,
    /// Lookups answered by the two-queue cache
    two_queue_hits: AtomicU64,
    /// Lookups the two-queue cache had to forward
    two_queue_misses: AtomicU64,
    /// `has` calls entering the outermost layer
    has_calls: AtomicU64,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_bloom_hit(&self) {
        self.bloom_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bloom_miss(&self) {
        self.bloom_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_has_call(&self) {
        self.has_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_two_queue_hit(&self) {
        self.two_queue_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_two_queue_miss(&self) {
        self.two_queue_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            bloom_hits: self.bloom_hits.load(Ordering::Relaxed),
            bloom_misses: self.bloom_misses.load(Ordering::Relaxed),
            two_queue_hits: self.two_queue_hits.load(Ordering::Relaxed),
            two_queue_misses: self.two_queue_misses.load(Ordering::Relaxed),
            has_calls: self.has_calls.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub bloom_hits: u64,
    pub bloom_misses: u64,
    pub two_queue_hits: u64,
    pub two_queue_misses: u64,
    pub has_calls: u64,
}

impl CacheMetricsSnapshot {
    /// Share of two-queue lookups served from cache
    pub fn two_queue_hit_rate(&self) -> f64 {
        let total = self.two_queue_hits + self.two_queue_misses;
        if total == 0 {
            0.0
        } else {
            self.two_queue_hits as f64 / total as f64
        }
    }
}
