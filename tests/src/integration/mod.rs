//! # Integration Flows
//!
//! - `verification_flows`: resolving authors over the network, caching, and
//!   verifying records against real validators
//! - `config_flows`: verifier configuration loaded from TOML files
//! - `block_cache_flows`: cached block store composition under load

pub mod block_cache_flows;
pub mod config_flows;
pub mod verification_flows;
