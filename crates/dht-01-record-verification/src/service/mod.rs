//! # Verification Service
//!
//! Application layer wiring the domain to the ports:
//! - [`PeerKeyResolver`]: cache, direct peer, DHT fallback chain
//! - [`RecordVerificationService`]: implements `RecordVerificationApi`

mod resolver;
mod verifier;

pub use resolver::PeerKeyResolver;
pub use verifier::{RecordVerificationService, VerifierDependencies};
