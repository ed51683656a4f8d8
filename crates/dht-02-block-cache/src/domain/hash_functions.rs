//! Hash functions for the existence filter
//!
//! MurmurHash3 with two seeds, combined by double hashing into k positions.

use std::io::Cursor;

/// Hash an element with MurmurHash3 (x64/128, lower 64 bits) under `seed`
pub fn murmur_hash(element: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(element);
    murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0) as u64
}

/// Compute k bit positions in a filter of m bits
///
/// Double hashing: h(i) = h1 + i * h2.
pub fn compute_hash_positions(element: &[u8], k: usize, m: usize) -> Vec<usize> {
    let h1 = murmur_hash(element, 0);
    let h2 = murmur_hash(element, 1);

    (0..k)
        .map(|i| {
            let hash = h1.wrapping_add((i as u64).wrapping_mul(h2));
            (hash % m as u64) as usize
        })
        .collect()
}
