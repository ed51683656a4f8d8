//! Record signatures.
//!
//! The author signs `len(key) || key || len(value) || value || author_id`,
//! lengths as big-endian u64. The length prefixes fix the key/value boundary
//! and the trailing author id stops a signature from being replayed under
//! another author.

use shared_crypto::{CryptoError, Keypair, PublicKey};
use shared_types::Record;

use crate::ports::outbound::SignatureChecker;

/// Bytes covered by a record signature.
pub fn record_signing_blob(record: &Record) -> Vec<u8> {
    let author = record.author.as_bytes();
    let mut blob = Vec::with_capacity(16 + record.key.len() + record.value.len() + author.len());
    blob.extend_from_slice(&(record.key.len() as u64).to_be_bytes());
    blob.extend_from_slice(&record.key);
    blob.extend_from_slice(&(record.value.len() as u64).to_be_bytes());
    blob.extend_from_slice(&record.value);
    blob.extend_from_slice(author);
    blob
}

/// Sign `record` as `keypair`, setting the author to the keypair's id.
pub fn sign_record(keypair: &Keypair, mut record: Record) -> Record {
    record.author = keypair.peer_id();
    let signature = keypair.sign(&record_signing_blob(&record));
    record.with_signature(signature)
}

/// [`SignatureChecker`] over [`record_signing_blob`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordSignatureChecker;

impl RecordSignatureChecker {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureChecker for RecordSignatureChecker {
    fn check_signature(&self, record: &Record, key: &PublicKey) -> Result<(), CryptoError> {
        key.verify(&record_signing_blob(record), &record.signature)
    }
}
