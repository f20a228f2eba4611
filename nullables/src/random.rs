//! Nullable random: deterministic nonces.

use rollcall_crypto::{CryptoError, NonceSource};
use rollcall_types::Nonce;
use std::sync::Mutex;

/// A deterministic nonce source for testing.
///
/// Returns pre-configured byte patterns in order, cycling when exhausted.
/// Each pattern is repeated or truncated to the requested length.
pub struct NullNonceSource {
    outputs: Vec<Vec<u8>>,
    index: Mutex<usize>,
}

impl NullNonceSource {
    /// Create with a sequence of deterministic byte patterns.
    pub fn new(outputs: Vec<Vec<u8>>) -> Self {
        assert!(!outputs.is_empty(), "NullNonceSource needs at least one output");
        Self {
            outputs,
            index: Mutex::new(0),
        }
    }

    /// Create a source that yields `[i; len]` for i = 1, 2, 3, ... (wrapping).
    pub fn counting() -> Self {
        Self::new((1..=255u8).map(|i| vec![i]).collect())
    }

    /// Create with a single pattern returned for every call.
    pub fn constant(value: Vec<u8>) -> Self {
        Self::new(vec![value])
    }
}

impl NonceSource for NullNonceSource {
    fn next_nonce(&self, len: usize) -> Result<Nonce, CryptoError> {
        let mut idx = self.index.lock().unwrap_or_else(|e| e.into_inner());
        let pattern = &self.outputs[*idx % self.outputs.len()];
        *idx += 1;
        let bytes: Vec<u8> = pattern.iter().copied().cycle().take(len).collect();
        Ok(Nonce::from_bytes(&bytes))
    }
}
