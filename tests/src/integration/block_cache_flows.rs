//! # Block Cache Flows
//!
//! A block store wrapped with both cache layers behaves like the bare store
//! while absorbing repeated and negative lookups.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use dht_02_block_cache::{
        cached_blockstore, cached_blockstore_with_metrics, Blockstore, CacheError, CacheMetrics,
        CacheOpts, CacheOptsBuilder, InMemoryBlockstore,
    };
    use shared_types::{Block, Cid};

    fn block(i: u32) -> Block {
        Block::new(format!("block payload {}", i).into_bytes())
    }

    #[test]
    fn test_cached_and_bare_store_agree() {
        let bare = Arc::new(InMemoryBlockstore::new());
        let cached = cached_blockstore(
            Arc::new(InMemoryBlockstore::new()),
            CacheOptsBuilder::new()
                .bloom_filter_size(1024)
                .bloom_filter_hashes(5)
                .two_queue_cache_size(32)
                .build()
                .unwrap(),
        )
        .unwrap();

        for i in 0..200u32 {
            let b = block(i);
            match i % 4 {
                0 | 1 => {
                    bare.put(b.clone()).unwrap();
                    cached.put(b).unwrap();
                }
                2 => {
                    let target = block(i / 2).cid();
                    bare.delete_block(&target).unwrap();
                    cached.delete_block(&target).unwrap();
                }
                _ => {}
            }

            for cid in [block(i / 3).cid(), block(i).cid(), Cid::of(b"never stored")] {
                assert_eq!(bare.has(&cid), cached.has(&cid), "has diverged at {}", i);
                assert_eq!(bare.get(&cid), cached.get(&cid), "get diverged at {}", i);
            }
        }

        let mut bare_keys = bare.all_keys().unwrap();
        let mut cached_keys = cached.all_keys().unwrap();
        bare_keys.sort();
        cached_keys.sort();
        assert_eq!(bare_keys, cached_keys);
    }

    #[test]
    fn test_existing_blocks_found_after_wrapping() {
        let inner = Arc::new(InMemoryBlockstore::with_blocks((0..100).map(block)));
        let metrics = Arc::new(CacheMetrics::new());
        let cached =
            cached_blockstore_with_metrics(inner.clone(), CacheOpts::default(), metrics.clone())
                .unwrap();

        for i in 0..100 {
            assert!(cached.has(&block(i).cid()).unwrap());
        }
        for i in 100..1100 {
            assert!(!cached.has(&block(i).cid()).unwrap());
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.has_calls, 1100);
        // absent lookups stop at the filter; only stored blocks reach the store
        assert!(inner.has_calls() >= 100 && inner.has_calls() < 110);
        assert!(snapshot.bloom_hits > 990);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let cached = cached_blockstore(Arc::new(InMemoryBlockstore::new()), CacheOpts::default())
            .unwrap();

        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let store = Arc::clone(&cached);
                thread::spawn(move || {
                    for i in 0..250 {
                        let b = block(t * 1000 + i);
                        store.put(b.clone()).unwrap();
                        assert!(store.has(&b.cid()).unwrap());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cached.all_keys().unwrap().len(), 1000);
        for t in 0..4u32 {
            for i in 0..250 {
                assert!(cached.has(&block(t * 1000 + i).cid()).unwrap());
            }
        }
    }

    #[test]
    fn test_misconfiguration_rejected_before_wrapping() {
        let inner = Arc::new(InMemoryBlockstore::with_blocks([block(1)]));
        let err = cached_blockstore(
            inner.clone(),
            CacheOpts {
                has_bloom_filter_size: 4096,
                has_bloom_filter_hashes: 0,
                has_two_queue_cache_size: 16,
            },
        )
        .err()
        .unwrap();

        assert!(matches!(err, CacheError::InvalidConfig(_)));
        assert_eq!(inner.has_calls(), 0);
    }
}
