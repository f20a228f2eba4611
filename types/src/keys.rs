//! The long-lived per-holder signing secret.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A holder's signing secret.
///
/// Only ever mixed into token signatures. This type intentionally does not
/// implement `Debug` or `Display` so it cannot leak through logs or error
/// messages. The bytes are zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
pub struct HolderSecret(Vec<u8>);

impl HolderSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for HolderSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for HolderSecret {}
