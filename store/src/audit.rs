//! Append-only audit log trait.

use crate::StoreError;
use rollcall_types::AuditRecord;

/// The append-only log of verification attempts.
///
/// Records are never updated or removed.
pub trait AuditLog: Send + Sync {
    /// Append one record. An error means the record was not persisted.
    fn append(&self, record: &AuditRecord) -> Result<(), StoreError>;

    /// Number of records appended so far.
    fn audit_len(&self) -> Result<u64, StoreError>;
}
