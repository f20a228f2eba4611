//! Blake2b hashing for storage identifiers.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use rollcall_types::{EventKey, HolderKey, Nonce, TokenId};

type Blake2b256 = Blake2b<U32>;

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Derive the storage id of the token at (nonce, holder, event).
///
/// Each part is length-prefixed so distinct coordinates never collide.
pub fn token_id(nonce: &Nonce, holder: &HolderKey, event: &EventKey) -> TokenId {
    let n = nonce.as_str().as_bytes();
    let h = holder.as_str().as_bytes();
    let e = event.as_str().as_bytes();
    TokenId::new(blake2b_256_multi(&[
        &(n.len() as u64).to_be_bytes(),
        n,
        &(h.len() as u64).to_be_bytes(),
        h,
        &(e.len() as u64).to_be_bytes(),
        e,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_multi_ignores_part_boundaries() {
        let joined = blake2b_256_multi(&[b"helloworld"]);
        let split = blake2b_256_multi(&[b"hello", b"world"]);
        assert_eq!(joined, split);
    }

    #[test]
    fn token_id_depends_on_every_coordinate() {
        let n = Nonce::new("aa");
        let h = HolderKey::parse("S100").unwrap();
        let e = EventKey::parse("E1").unwrap();
        let base = token_id(&n, &h, &e);
        assert_eq!(base, token_id(&n, &h, &e));
        assert_ne!(base, token_id(&Nonce::new("ab"), &h, &e));
        assert_ne!(base, token_id(&n, &HolderKey::parse("S101").unwrap(), &e));
        assert_ne!(base, token_id(&n, &h, &EventKey::parse("E2").unwrap()));
    }

    #[test]
    fn token_id_is_not_fooled_by_shifting_boundaries() {
        let a = token_id(
            &Nonce::new("ab"),
            &HolderKey::parse("c").unwrap(),
            &EventKey::parse("d").unwrap(),
        );
        let b = token_id(
            &Nonce::new("a"),
            &HolderKey::parse("bc").unwrap(),
            &EventKey::parse("d").unwrap(),
        );
        assert_ne!(a, b);
    }
}
