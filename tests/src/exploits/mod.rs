//! # Attack Simulations
//!
//! - `amplification`: unverifiable records used to make a node generate
//!   network traffic
//! - `key_substitution`: peers answering key requests with keys they do not
//!   own

pub mod amplification;
pub mod key_substitution;
