//! Randomness for nonces and holder secrets.

use crate::CryptoError;
use rollcall_types::{HolderSecret, Nonce};

/// Length of a freshly enrolled holder secret.
pub const HOLDER_SECRET_BYTES: usize = 32;

/// A source of token nonces.
///
/// Production uses [`OsNonceSource`]; tests swap in a deterministic source.
pub trait NonceSource: Send + Sync {
    /// Produce a fresh nonce of `len` random bytes.
    fn next_nonce(&self, len: usize) -> Result<Nonce, CryptoError>;
}

/// Nonces drawn from the operating system CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn next_nonce(&self, len: usize) -> Result<Nonce, CryptoError> {
        let mut buf = vec![0u8; len];
        getrandom::getrandom(&mut buf).map_err(|e| CryptoError::RandomUnavailable(e.to_string()))?;
        Ok(Nonce::from_bytes(&buf))
    }
}

/// Generate a new random holder secret for enrollment.
pub fn generate_holder_secret() -> Result<HolderSecret, CryptoError> {
    let mut buf = vec![0u8; HOLDER_SECRET_BYTES];
    getrandom::getrandom(&mut buf).map_err(|e| CryptoError::RandomUnavailable(e.to_string()))?;
    Ok(HolderSecret::new(buf))
}
