//! # DHT Node Test Suite
//!
//! Cross-crate tests that exercise the verification core, the block cache
//! and logging setup together.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/              # criterion benchmarks
//! └── src/
//!     ├── fixtures.rs       # Node wiring shared by the tests below
//!     ├── exploits/         # Attack simulations
//!     └── integration/      # End-to-end flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dht-tests
//! cargo test -p dht-tests integration::
//! cargo test -p dht-tests exploits::
//! cargo bench -p dht-tests
//! ```

#[cfg(test)]
mod fixtures;

pub mod exploits;
pub mod integration;
