//! Block cache configuration and validation
//!
//! # Example
//!
//! ```
//! use dht_02_block_cache::CacheOptsBuilder;
//!
//! let opts = CacheOptsBuilder::new()
//!     .bloom_filter_size(64 << 10)
//!     .bloom_filter_hashes(5)
//!     .two_queue_cache_size(0)
//!     .build()
//!     .unwrap();
//! assert_eq!(opts.bloom_filter_bits(), Some(512 << 10));
//! ```

use crate::error::CacheError;

/// Options for [`cached_blockstore`](crate::cached_blockstore).
///
/// Approximate memory cost per unit is noted on each field. Zero disables
/// the corresponding layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheOpts {
    /// Bloom filter size in bytes (1 byte each)
    pub has_bloom_filter_size: usize,
    /// Bloom filter hash count (7 is usually best)
    pub has_bloom_filter_hashes: usize,
    /// Two-queue cache capacity in entries (about 32 bytes each)
    pub has_two_queue_cache_size: usize,
}

impl Default for CacheOpts {
    fn default() -> Self {
        Self {
            has_bloom_filter_size: 512 << 10, // 512 KiB
            has_bloom_filter_hashes: 7,
            has_two_queue_cache_size: 64 << 10,
        }
    }
}

impl CacheOpts {
    /// Options with both layers disabled.
    pub fn disabled() -> Self {
        Self {
            has_bloom_filter_size: 0,
            has_bloom_filter_hashes: 0,
            has_two_queue_cache_size: 0,
        }
    }

    /// Reject combinations that would silently degrade the cache
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.has_bloom_filter_size != 0 && self.has_bloom_filter_hashes == 0 {
            return Err(CacheError::InvalidConfig(
                "bloom filter hash count can't be 0 when there is size set".to_string(),
            ));
        }

        if self.has_bloom_filter_size.checked_mul(8).is_none() {
            return Err(CacheError::InvalidConfig(format!(
                "bloom filter size of {} bytes overflows when converted to bits",
                self.has_bloom_filter_size
            )));
        }

        Ok(())
    }

    /// Bloom filter size in bits, or `None` when the layer is disabled
    pub fn bloom_filter_bits(&self) -> Option<usize> {
        match self.has_bloom_filter_size {
            0 => None,
            bytes => bytes.checked_mul(8),
        }
    }

    /// Whether the two-queue layer is enabled
    pub fn two_queue_enabled(&self) -> bool {
        self.has_two_queue_cache_size > 0
    }
}

/// Builder for CacheOpts with validation
#[derive(Default)]
pub struct CacheOptsBuilder {
    bloom_filter_size: Option<usize>,
    bloom_filter_hashes: Option<usize>,
    two_queue_cache_size: Option<usize>,
}

impl CacheOptsBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bloom filter size in bytes (0 disables the filter)
    pub fn bloom_filter_size(mut self, bytes: usize) -> Self {
        self.bloom_filter_size = Some(bytes);
        self
    }

    /// Set bloom filter hash count
    pub fn bloom_filter_hashes(mut self, hashes: usize) -> Self {
        self.bloom_filter_hashes = Some(hashes);
        self
    }

    /// Set two-queue cache capacity (0 disables the cache)
    pub fn two_queue_cache_size(mut self, entries: usize) -> Self {
        self.two_queue_cache_size = Some(entries);
        self
    }

    /// Build the CacheOpts, validating all parameters
    pub fn build(self) -> Result<CacheOpts, CacheError> {
        let defaults = CacheOpts::default();
        let opts = CacheOpts {
            has_bloom_filter_size: self.bloom_filter_size.unwrap_or(defaults.has_bloom_filter_size),
            has_bloom_filter_hashes: self
                .bloom_filter_hashes
                .unwrap_or(defaults.has_bloom_filter_hashes),
            has_two_queue_cache_size: self
                .two_queue_cache_size
                .unwrap_or(defaults.has_two_queue_cache_size),
        };
        opts.validate()?;
        Ok(opts)
    }
}
