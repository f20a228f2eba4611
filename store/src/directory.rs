//! Lookup interfaces for the records owned by external collaborators.

use crate::StoreError;
use rollcall_types::{EventKey, EventWindow, HolderIdentity, HolderKey};

/// Resolves holder keys to identities. Read-only from the core's side.
pub trait HolderDirectory: Send + Sync {
    /// `Ok(None)` when the holder does not exist.
    fn lookup_holder(&self, key: &HolderKey) -> Result<Option<HolderIdentity>, StoreError>;
}

/// Resolves event keys to event windows. Read-only from the core's side.
pub trait EventDirectory: Send + Sync {
    /// `Ok(None)` when the event does not exist.
    fn lookup_event(&self, key: &EventKey) -> Result<Option<EventWindow>, StoreError>;
}
