//! LMDB storage backend for rollcall.
//!
//! Implements every storage trait from `rollcall-store` using the `heed` LMDB
//! bindings. Holders, events, tokens and the audit log share one environment,
//! so the acceptance of a token and its audit record commit in a single write
//! transaction.

pub mod audit;
pub mod directory;
pub mod environment;
pub mod error;
pub mod token;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
