//! Two-queue (2Q) cache
//!
//! Entries seen once live in `recent`. A second hit promotes them to
//! `frequent`. Keys evicted from `recent` are remembered in a ghost list so a
//! quick re-add goes straight to `frequent`. One-off scans therefore cannot
//! flush the hot set.
//!
//! INVARIANTS:
//! - `len() <= capacity()`
//! - A key lives in at most one of `recent` and `frequent`

use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::error::CacheError;

/// Share of the capacity reserved for entries seen once
pub const RECENT_RATIO: f64 = 0.25;

/// Ghost list size as a share of the capacity
pub const GHOST_RATIO: f64 = 0.5;

/// Fixed-capacity 2Q cache
pub struct TwoQueueCache<K: Hash + Eq, V> {
    capacity: usize,
    recent_target: usize,
    recent: LruCache<K, V>,
    frequent: LruCache<K, V>,
    recent_evicted: LruCache<K, ()>,
}

impl<K: Hash + Eq + Clone, V> TwoQueueCache<K, V> {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        let size = NonZeroUsize::new(capacity).ok_or_else(|| {
            CacheError::InvalidConfig("two-queue cache size must be positive".to_string())
        })?;

        let recent_target = (capacity as f64 * RECENT_RATIO) as usize;
        let ghost_size = ((capacity as f64 * GHOST_RATIO) as usize).max(1);
        let ghost_size = NonZeroUsize::new(ghost_size).unwrap_or(NonZeroUsize::MIN);

        Ok(Self {
            capacity,
            recent_target,
            recent: LruCache::new(size),
            frequent: LruCache::new(size),
            recent_evicted: LruCache::new(ghost_size),
        })
    }

    /// Look up a key, promoting it to the frequent queue on a hit
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.frequent.contains(key) {
            return self.frequent.get(key);
        }

        let value = self.recent.pop(key)?;
        self.frequent.put(key.clone(), value);
        self.frequent.get(key)
    }

    /// Look up a key without touching recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.frequent.peek(key).or_else(|| self.recent.peek(key))
    }

    /// Whether the key is cached
    pub fn contains(&self, key: &K) -> bool {
        self.frequent.contains(key) || self.recent.contains(key)
    }

    /// Insert or update an entry
    pub fn put(&mut self, key: K, value: V) {
        if self.frequent.contains(&key) {
            self.frequent.put(key, value);
            return;
        }

        if self.recent.pop(&key).is_some() {
            self.frequent.put(key, value);
            return;
        }

        if self.recent_evicted.pop(&key).is_some() {
            self.ensure_space(true);
            self.frequent.put(key, value);
            return;
        }

        self.ensure_space(false);
        self.recent.put(key, value);
    }

    /// Drop an entry from every queue
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.recent_evicted.pop(key);
        self.frequent.pop(key).or_else(|| self.recent.pop(key))
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.recent.len() + self.frequent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of live entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all entries including ghosts
    pub fn clear(&mut self) {
        self.recent.clear();
        self.frequent.clear();
        self.recent_evicted.clear();
    }

    fn ensure_space(&mut self, promoting_ghost: bool) {
        let recent_len = self.recent.len();
        if recent_len + self.frequent.len() < self.capacity {
            return;
        }

        let recent_over_target = recent_len > self.recent_target
            || (recent_len == self.recent_target && !promoting_ghost);

        if recent_len > 0 && recent_over_target {
            if let Some((key, _)) = self.recent.pop_lru() {
                self.recent_evicted.put(key, ());
            }
            return;
        }

        self.frequent.pop_lru();
    }
}
