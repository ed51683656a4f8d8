//! Bloom filter over block identifiers
//!
//! INVARIANTS:
//! - No false negatives: if inserted, `contains()` returns true
//! - No deletion: bits are only ever set, until `clear()`

use bitvec::prelude::*;

use super::hash_functions::compute_hash_positions;

/// Bloom filter for probabilistic membership testing
#[derive(Clone, Debug)]
pub struct BloomFilter {
    /// Bit array storing the filter state
    bits: BitVec<u8, Lsb0>,
    /// Number of hash functions (k)
    k: usize,
    /// Size in bits (m)
    m: usize,
    /// Number of insertions (n)
    n: usize,
}

impl BloomFilter {
    /// Create a filter of `m` bits probed by `k` hash functions
    ///
    /// Callers guarantee `m > 0` and `k > 0`; `CacheOpts::validate` and
    /// `BloomCachedBlockstore` enforce it.
    pub fn new(m: usize, k: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; m],
            k,
            m,
            n: 0,
        }
    }

    /// Insert an element
    pub fn insert(&mut self, element: &[u8]) {
        for pos in compute_hash_positions(element, self.k, self.m) {
            self.bits.set(pos, true);
        }
        self.n += 1;
    }

    /// `false` means definitely absent; `true` means possibly present
    pub fn contains(&self, element: &[u8]) -> bool {
        compute_hash_positions(element, self.k, self.m)
            .iter()
            .all(|&pos| self.bits[pos])
    }

    /// Expected false positive rate: (1 - e^(-kn/m))^k
    pub fn false_positive_rate(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        let exponent = -(self.k as f64) * (self.n as f64) / (self.m as f64);
        (1.0 - exponent.exp()).powi(self.k as i32)
    }

    /// Number of bits set
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Size in bits
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Number of hash functions
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Number of insertions
    pub fn elements_inserted(&self) -> usize {
        self.n
    }

    /// Reset every bit
    pub fn clear(&mut self) {
        self.bits.fill(false);
        self.n = 0;
    }
}
