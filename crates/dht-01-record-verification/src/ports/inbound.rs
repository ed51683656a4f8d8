//! # Inbound Ports (Driving Ports / API)
//!
//! What the rest of the node calls.

use async_trait::async_trait;
use shared_crypto::PublicKey;
use shared_types::{PeerId, Record};

use crate::domain::context::OperationContext;
use crate::domain::entities::VerificationMode;
use crate::domain::errors::VerificationError;

/// Record verification API.
///
/// # Choosing a mode
///
/// Use [`VerificationMode::Offline`] for anything a remote peer pushed at
/// us. [`VerificationMode::Online`] may trigger network key lookups and is
/// only for values this node asked for itself.
#[async_trait]
pub trait RecordVerificationApi: Send + Sync {
    /// Verify `record`: signature (if present) against the author's key,
    /// then structure.
    async fn verify(
        &self,
        ctx: &OperationContext,
        record: &Record,
        mode: VerificationMode,
    ) -> Result<(), VerificationError>;

    /// Resolve the public key owning `peer` through every tier.
    async fn resolve_public_key(
        &self,
        ctx: &OperationContext,
        peer: &PeerId,
    ) -> Result<PublicKey, VerificationError>;
}
