//! Block store port

use shared_types::{Block, Cid};

use crate::error::BlockstoreError;

/// Content-addressed block storage.
///
/// Cached wrappers implement this same trait, so layers stack freely.
pub trait Blockstore: Send + Sync {
    /// Whether a block with this cid is stored
    fn has(&self, cid: &Cid) -> Result<bool, BlockstoreError>;

    /// Fetch a block; `NotFound` if absent
    fn get(&self, cid: &Cid) -> Result<Block, BlockstoreError>;

    /// Size of a stored block's data in bytes
    fn get_size(&self, cid: &Cid) -> Result<usize, BlockstoreError>;

    /// Store a block
    fn put(&self, block: Block) -> Result<(), BlockstoreError>;

    /// Store several blocks
    fn put_many(&self, blocks: Vec<Block>) -> Result<(), BlockstoreError> {
        for block in blocks {
            self.put(block)?;
        }
        Ok(())
    }

    /// Remove a block; removing an absent block is not an error
    fn delete_block(&self, cid: &Cid) -> Result<(), BlockstoreError>;

    /// Every stored cid
    fn all_keys(&self) -> Result<Vec<Cid>, BlockstoreError>;
}
