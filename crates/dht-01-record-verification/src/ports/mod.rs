//! Ports layer: inbound API and outbound capabilities.

pub mod inbound;
pub mod outbound;

pub use inbound::RecordVerificationApi;
pub use outbound::{
    ConfigProvider, DhtValueLookup, KeyCache, PeerKeyQuery, RecordValidator, SignatureChecker,
    TimeSource,
};
