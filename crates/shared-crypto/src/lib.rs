//! # Shared Crypto - Peer Keys and Identity
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Default peer identity keys |
//! | `ecdsa` | secp256k1 | Alternate peer identity keys |
//! | `keys` | tagged encoding + SHA-256 | Key marshalling, `PeerId` derivation |
//!
//! ## Identity Binding
//!
//! A `PeerId` is `sha256(marshal(public_key))`. Deriving the id from a key
//! that was fetched from an untrusted source and comparing it with the id
//! the source claimed is the only way to prove the key belongs to the peer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod keys;
pub mod signatures;

// Re-exports
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
pub use errors::CryptoError;
pub use keys::{derive_peer_id, unmarshal_public_key, KeyType, Keypair, PublicKey};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
