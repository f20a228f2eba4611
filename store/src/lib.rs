//! Abstract storage traits for rollcall.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The issuer and verifier depend only on the traits.

pub mod audit;
pub mod directory;
pub mod error;
pub mod token;

pub use audit::AuditLog;
pub use directory::{EventDirectory, HolderDirectory};
pub use error::StoreError;
pub use token::{AttendanceStore, TokenStore};
