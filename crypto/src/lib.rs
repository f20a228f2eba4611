//! Cryptographic primitives for rollcall.
//!
//! - **SHA-256** over `holder|event|nonce|secret` for token signatures
//! - **Blake2b** for storage identifiers derived from token coordinates
//! - **OS CSPRNG** for nonces and holder secrets

pub mod error;
pub mod hash;
pub mod random;
pub mod sign;

pub use error::CryptoError;
pub use hash::{blake2b_256_multi, token_id};
pub use random::{generate_holder_secret, NonceSource, OsNonceSource};
pub use sign::{sign_token, verify_token_signature};
