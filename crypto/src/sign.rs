//! Token signatures.
//!
//! Issuance and verification both go through [`sign_token`], so the field
//! order and separator can never drift between the two sides.

use rollcall_types::{EventKey, HolderKey, HolderSecret, Nonce, TokenSignature};
use sha2::{Digest, Sha256};

const SEPARATOR: &[u8] = b"|";

/// Compute the signature over `holder|event|nonce|secret`.
///
/// Holder and event keys cannot contain `|` and nonces are hex, so the
/// concatenation is unambiguous; the secret is last and may hold any bytes.
pub fn sign_token(
    holder: &HolderKey,
    event: &EventKey,
    nonce: &Nonce,
    secret: &HolderSecret,
) -> TokenSignature {
    let mut hasher = Sha256::new();
    hasher.update(holder.as_str().as_bytes());
    hasher.update(SEPARATOR);
    hasher.update(event.as_str().as_bytes());
    hasher.update(SEPARATOR);
    hasher.update(nonce.as_str().as_bytes());
    hasher.update(SEPARATOR);
    hasher.update(secret.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    TokenSignature::new(out)
}

/// Recompute the expected signature and compare it with `presented`.
pub fn verify_token_signature(
    holder: &HolderKey,
    event: &EventKey,
    nonce: &Nonce,
    secret: &HolderSecret,
    presented: &TokenSignature,
) -> bool {
    let expected = sign_token(holder, event, nonce, secret);
    // Fold the whole array so timing does not reveal the first mismatch.
    expected
        .as_bytes()
        .iter()
        .zip(presented.as_bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
