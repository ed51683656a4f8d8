//! In-memory block store

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use shared_types::{Block, Cid};

use crate::error::BlockstoreError;
use crate::ports::Blockstore;

/// HashMap-backed block store.
///
/// Counts `has`/`get` calls so tests can see which lookups reach the
/// backing store.
#[derive(Default)]
pub struct InMemoryBlockstore {
    blocks: RwLock<HashMap<Cid, Block>>,
    has_calls: AtomicU64,
    get_calls: AtomicU64,
}

impl InMemoryBlockstore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `blocks`
    pub fn with_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        let store = Self::new();
        {
            let mut map = store.blocks.write();
            for block in blocks {
                map.insert(block.cid(), block);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    /// Calls to `has` that reached this store
    pub fn has_calls(&self) -> u64 {
        self.has_calls.load(Ordering::Relaxed)
    }

    /// Calls to `get` that reached this store
    pub fn get_calls(&self) -> u64 {
        self.get_calls.load(Ordering::Relaxed)
    }
}

impl Blockstore for InMemoryBlockstore {
    fn has(&self, cid: &Cid) -> Result<bool, BlockstoreError> {
        self.has_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.blocks.read().contains_key(cid))
    }

    fn get(&self, cid: &Cid) -> Result<Block, BlockstoreError> {
        self.get_calls.fetch_add(1, Ordering::Relaxed);
        self.blocks
            .read()
            .get(cid)
            .cloned()
            .ok_or(BlockstoreError::NotFound(*cid))
    }

    fn get_size(&self, cid: &Cid) -> Result<usize, BlockstoreError> {
        self.blocks
            .read()
            .get(cid)
            .map(|block| block.data().len())
            .ok_or(BlockstoreError::NotFound(*cid))
    }

    fn put(&self, block: Block) -> Result<(), BlockstoreError> {
        self.blocks.write().insert(block.cid(), block);
        Ok(())
    }

    fn delete_block(&self, cid: &Cid) -> Result<(), BlockstoreError> {
        self.blocks.write().remove(cid);
        Ok(())
    }

    fn all_keys(&self) -> Result<Vec<Cid>, BlockstoreError> {
        Ok(self.blocks.read().keys().copied().collect())
    }
}
