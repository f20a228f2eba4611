//! The presence token record.

use crate::{EventKey, HolderKey, Nonce, Timestamp, TokenId, TokenSignature};
use serde::{Deserialize, Serialize};

/// A single-use, time-bounded presence token as persisted by the token store.
///
/// `used` only ever transitions from `false` to `true`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub nonce: Nonce,
    pub holder: HolderKey,
    pub event: EventKey,
    pub signature: TokenSignature,
    pub expires_at: Timestamp,
    pub used: bool,
    pub created_at: Timestamp,
}

impl Token {
    /// Latest instant at which the token is still accepted (as late).
    pub fn grace_deadline(&self, grace_secs: u64) -> Timestamp {
        self.expires_at.plus_secs(grace_secs)
    }

    /// Whether `now` is at or before the nominal expiry.
    pub fn is_on_time(&self, now: Timestamp) -> bool {
        now <= self.expires_at
    }
}
