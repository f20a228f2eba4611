//! Presence token lifecycle.
//!
//! Two components share one set of collaborators:
//! 1. **Issuer**: resolves a holder and an event, draws a nonce, signs, and
//!    persists a short-lived single-use token.
//! 2. **Verifier**: judges one presentation of a token (references, prior
//!    use, time window, signature), accepts it at most once, and appends
//!    exactly one audit record per attempt.
//!
//! Storage, lookups, time and randomness are all behind traits so the same
//! code runs against LMDB in production and against nullables in tests.

pub mod collaborators;
pub mod error;
pub mod issuer;
pub mod outcome;
pub mod verifier;

pub use collaborators::Collaborators;
pub use error::{IssueError, PresenceError};
pub use issuer::{IssuedToken, Issuer};
pub use outcome::{Presentation, VerifyOutcome};
pub use verifier::Verifier;
