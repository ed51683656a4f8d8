//! Ports

pub mod blockstore;

pub use blockstore::Blockstore;
