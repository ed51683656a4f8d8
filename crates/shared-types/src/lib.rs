//! # Shared Types Crate
//!
//! Entities exchanged between the record-verification core, the block
//! cache, and their callers.
//!
//! ## Clusters
//!
//! - **Identity**: `PeerId`
//! - **Records**: `Record`
//! - **Blocks**: `Cid`, `Block`

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
