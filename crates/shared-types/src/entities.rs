//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `PeerId`, derived one-way from a public key
//! - **Records**: `Record`, a signed or unsigned key/value assertion
//! - **Blocks**: `Cid`, `Block`, content-addressed storage units

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};

use crate::errors::IdError;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Unique identifier for a network participant.
///
/// A `PeerId` is the SHA-256 digest of the participant's marshalled public
/// key. The mapping is one-way: the key for an id can only be discovered,
/// never computed.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(#[serde_as(as = "Bytes")] pub Hash);

impl PeerId {
    /// Length of a peer id in bytes.
    pub const LEN: usize = 32;

    /// Wrap a raw digest.
    pub const fn new(bytes: Hash) -> Self {
        Self(bytes)
    }

    /// Parse a peer id from a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdError> {
        let digest: Hash = bytes.try_into().map_err(|_| IdError::InvalidLength {
            expected: Self::LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(digest))
    }

    /// Parse a peer id from its hex representation.
    pub fn from_hex(s: &str) -> Result<Self, IdError> {
        let bytes = hex::decode(s).map_err(|e| IdError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Raw bytes of the id.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Full hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PeerId {
    /// Short form used in logs: the first eight bytes in hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.to_hex())
    }
}

// =============================================================================
// CLUSTER B: RECORDS
// =============================================================================

/// A key/value assertion exchanged between peers.
///
/// A record with an empty `signature` is unsigned: it is exempt from
/// signature checking but still subject to structural validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Namespaced DHT key, e.g. `/pk/<peer id bytes>`.
    pub key: Vec<u8>,
    /// Opaque payload.
    pub value: Vec<u8>,
    /// Peer that authored (and, if signed, signed) the record.
    pub author: PeerId,
    /// Signature over the record's signing blob; empty when unsigned.
    pub signature: Vec<u8>,
    /// Unix seconds at which the local node received the record, if known.
    #[serde(default)]
    pub time_received: Option<u64>,
}

impl Record {
    /// Build an unsigned record.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, author: PeerId) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            author,
            signature: Vec::new(),
            time_received: None,
        }
    }

    /// Attach a signature.
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    /// Stamp the receive time (unix seconds).
    pub fn received_at(mut self, unix_secs: u64) -> Self {
        self.time_received = Some(unix_secs);
        self
    }

    /// Whether the record carries a signature.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}

// =============================================================================
// CLUSTER C: BLOCKS
// =============================================================================

/// Content identifier: the SHA-256 digest of a block's data.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cid(#[serde_as(as = "Bytes")] pub Hash);

impl Cid {
    /// Compute the content identifier of `data`.
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({})", hex::encode(&self.0[..8]))
    }
}

/// An immutable, content-addressed block of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    cid: Cid,
    data: Vec<u8>,
}

impl Block {
    /// Create a block, computing its cid from the data.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            cid: Cid::of(&data),
            data,
        }
    }

    /// The block's content identifier.
    pub fn cid(&self) -> Cid {
        self.cid
    }

    /// The block's payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
