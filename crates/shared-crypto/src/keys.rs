//! # Peer Keys
//!
//! Algorithm-tagged public keys, their wire encoding, and `PeerId`
//! derivation.
//!
//! ## Encoding
//!
//! ```text
//! marshal(key) = type_tag (1 byte) || raw key bytes
//!   type_tag 1 = Ed25519   (32 key bytes)
//!   type_tag 2 = secp256k1 (33 compressed key bytes)
//! ```

use std::fmt;

use sha2::{Digest, Sha256};
use shared_types::PeerId;

use crate::ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
use crate::signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
use crate::CryptoError;

/// Supported key algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Ed25519
    Ed25519,
    /// secp256k1 ECDSA
    Secp256k1,
}

impl KeyType {
    /// Wire tag for this algorithm.
    pub fn tag(self) -> u8 {
        match self {
            KeyType::Ed25519 => 1,
            KeyType::Secp256k1 => 2,
        }
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: u8) -> Result<Self, CryptoError> {
        match tag {
            1 => Ok(KeyType::Ed25519),
            2 => Ok(KeyType::Secp256k1),
            other => Err(CryptoError::UnknownKeyType(other)),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Ed25519 => write!(f, "ed25519"),
            KeyType::Secp256k1 => write!(f, "secp256k1"),
        }
    }
}

/// A peer's public verification key.
///
/// Immutable once obtained. It is bound to the `PeerId` that
/// [`derive_peer_id`] computes from it, and to no other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PublicKey {
    /// Ed25519 key
    Ed25519(Ed25519PublicKey),
    /// secp256k1 key
    Secp256k1(Secp256k1PublicKey),
}

impl PublicKey {
    /// Algorithm of this key.
    pub fn key_type(&self) -> KeyType {
        match self {
            PublicKey::Ed25519(_) => KeyType::Ed25519,
            PublicKey::Secp256k1(_) => KeyType::Secp256k1,
        }
    }

    /// Tagged wire encoding.
    pub fn marshal(&self) -> Vec<u8> {
        let raw: &[u8] = match self {
            PublicKey::Ed25519(k) => k.as_bytes(),
            PublicKey::Secp256k1(k) => k.as_bytes(),
        };
        let mut out = Vec::with_capacity(1 + raw.len());
        out.push(self.key_type().tag());
        out.extend_from_slice(raw);
        out
    }

    /// Verify `signature` over `message`.
    ///
    /// Signature bytes are parsed according to the key's algorithm; a
    /// wrongly sized signature is a format error, not a verification error.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        match self {
            PublicKey::Ed25519(k) => k.verify(message, &Ed25519Signature::from_slice(signature)?),
            PublicKey::Secp256k1(k) => {
                k.verify(message, &Secp256k1Signature::from_slice(signature)?)
            }
        }
    }

    /// The `PeerId` this key proves ownership of.
    pub fn peer_id(&self) -> PeerId {
        derive_peer_id(self)
    }
}

/// Decode a tagged key encoding, validating the curve point.
pub fn unmarshal_public_key(bytes: &[u8]) -> Result<PublicKey, CryptoError> {
    let (&tag, raw) = bytes.split_first().ok_or(CryptoError::EmptyKey)?;
    match KeyType::from_tag(tag)? {
        KeyType::Ed25519 => Ok(PublicKey::Ed25519(Ed25519PublicKey::from_slice(raw)?)),
        KeyType::Secp256k1 => Ok(PublicKey::Secp256k1(Secp256k1PublicKey::from_slice(raw)?)),
    }
}

/// Derive the identity bound to `key`: `sha256(marshal(key))`.
pub fn derive_peer_id(key: &PublicKey) -> PeerId {
    PeerId::new(Sha256::digest(key.marshal()).into())
}

/// A signing keypair of either supported algorithm.
pub enum Keypair {
    /// Ed25519 keypair
    Ed25519(Ed25519KeyPair),
    /// secp256k1 keypair
    Secp256k1(Secp256k1KeyPair),
}

impl Keypair {
    /// Fresh random Ed25519 keypair.
    pub fn generate_ed25519() -> Self {
        Keypair::Ed25519(Ed25519KeyPair::generate())
    }

    /// Fresh random secp256k1 keypair.
    pub fn generate_secp256k1() -> Self {
        Keypair::Secp256k1(Secp256k1KeyPair::generate())
    }

    /// Public half.
    pub fn public(&self) -> PublicKey {
        match self {
            Keypair::Ed25519(kp) => PublicKey::Ed25519(kp.public_key()),
            Keypair::Secp256k1(kp) => PublicKey::Secp256k1(kp.public_key()),
        }
    }

    /// Identity derived from the public half.
    pub fn peer_id(&self) -> PeerId {
        self.public().peer_id()
    }

    /// Sign `message`, returning the raw signature bytes.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            Keypair::Ed25519(kp) => kp.sign(message).as_bytes().to_vec(),
            Keypair::Secp256k1(kp) => kp.sign(message).as_bytes().to_vec(),
        }
    }
}
