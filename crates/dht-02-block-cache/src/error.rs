//! Error types for the block cache subsystem

use shared_types::Cid;
use thiserror::Error;

/// Errors that can occur while composing or using a cached block store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),

    #[error("Block store error: {0}")]
    Store(#[from] BlockstoreError),
}

/// Errors from block stores
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlockstoreError {
    #[error("Block not found: {0}")]
    NotFound(Cid),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl BlockstoreError {
    /// Whether this is a plain miss rather than a backend failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlockstoreError::NotFound(_))
    }
}
