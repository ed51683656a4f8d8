//! # Record Key Namespaces
//!
//! DHT record keys have the shape `/<namespace>/<path>`. Public keys live
//! under `/pk/<raw peer id bytes>`, which binds the lookup key to the
//! identifier by construction.

use shared_types::PeerId;

use crate::domain::errors::ValidationError;

/// Namespace holding public-key records.
pub const PUBLIC_KEY_NAMESPACE: &str = "pk";

const PUBLIC_KEY_PREFIX: &[u8] = b"/pk/";

/// Canonical DHT key for "public key of `peer`".
pub fn public_key_lookup_key(peer: &PeerId) -> Vec<u8> {
    let mut key = Vec::with_capacity(PUBLIC_KEY_PREFIX.len() + PeerId::LEN);
    key.extend_from_slice(PUBLIC_KEY_PREFIX);
    key.extend_from_slice(peer.as_bytes());
    key
}

/// Split a record key into `(namespace, path)`.
///
/// The path is raw bytes and may itself contain `/`.
pub fn split_namespace(key: &[u8]) -> Result<(&str, &[u8]), ValidationError> {
    let malformed = || ValidationError::MalformedKey(String::from_utf8_lossy(key).into_owned());

    let rest = key.strip_prefix(b"/").ok_or_else(malformed)?;
    let sep = rest.iter().position(|&b| b == b'/').ok_or_else(malformed)?;
    let (namespace, path) = (&rest[..sep], &rest[sep + 1..]);
    if namespace.is_empty() {
        return Err(malformed());
    }
    let namespace = std::str::from_utf8(namespace).map_err(|_| malformed())?;
    Ok((namespace, path))
}
