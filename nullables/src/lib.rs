//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies (clock, randomness, storage) are abstracted
//! behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including simulated outages
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod random;
pub mod store;

pub use clock::NullClock;
pub use random::NullNonceSource;
pub use store::NullStore;
