//! Token storage traits.

use crate::{AuditLog, StoreError};
use rollcall_types::{AuditRecord, EventKey, HolderKey, Nonce, Token, TokenId};

/// Persistence of issued tokens.
pub trait TokenStore: Send + Sync {
    /// Persist a freshly issued token. Fails with [`StoreError::Duplicate`]
    /// if a token with the same id already exists.
    fn save(&self, token: &Token) -> Result<(), StoreError>;

    /// Find the token issued at (nonce, holder, event).
    fn find_by_nonce_holder_event(
        &self,
        nonce: &Nonce,
        holder: &HolderKey,
        event: &EventKey,
    ) -> Result<Option<Token>, StoreError>;

    /// Set `used = true` only if it was `false`.
    ///
    /// Returns `true` for the single caller that performed the transition and
    /// `false` for every caller that observed the token already used.
    fn mark_used_if_unused(&self, id: &TokenId) -> Result<bool, StoreError>;
}

/// A store holding both tokens and the audit log, able to commit an
/// acceptance as one transaction.
pub trait AttendanceStore: TokenStore + AuditLog {
    /// Atomically mark the token used and append `record`.
    ///
    /// Returns `false`, appending nothing, if the token was already used.
    /// Either both effects are persisted or neither is.
    fn commit_acceptance(&self, id: &TokenId, record: &AuditRecord) -> Result<bool, StoreError>;
}
