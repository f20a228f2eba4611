//! LMDB implementation of AuditLog and AttendanceStore.
//!
//! Records are keyed by a big-endian sequence number so iteration order is
//! append order. The next sequence number lives in `meta` under
//! [`AUDIT_SEQ_KEY`] and is advanced in the same transaction as the record.

use heed::RwTxn;
use rollcall_store::{AttendanceStore, AuditLog, StoreError};
use rollcall_types::{AuditRecord, TokenId};
use tracing::debug;

use crate::{LmdbEnvironment, LmdbError};

const AUDIT_SEQ_KEY: &[u8] = b"audit_seq";

impl LmdbEnvironment {
    fn append_in(&self, wtxn: &mut RwTxn<'_>, record: &AuditRecord) -> Result<u64, LmdbError> {
        let seq = match self.meta_db.get(wtxn, AUDIT_SEQ_KEY)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization("audit_seq has unexpected byte length".into())
                })?;
                u64::from_be_bytes(arr)
            }
            None => 0,
        };
        let bytes = bincode::serialize(record)?;
        self.audit_db.put(wtxn, &seq.to_be_bytes(), &bytes)?;
        self.meta_db
            .put(wtxn, AUDIT_SEQ_KEY, &(seq + 1).to_be_bytes())?;
        Ok(seq)
    }

    /// Every audit record in append order.
    pub fn audit_records(&self) -> Result<Vec<AuditRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut records = Vec::new();
        for entry in self.audit_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = entry.map_err(LmdbError::from)?;
            records.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(records)
    }
}

impl AuditLog for LmdbEnvironment {
    fn append(&self, record: &AuditRecord) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let seq = self.append_in(&mut wtxn, record)?;
        wtxn.commit().map_err(LmdbError::from)?;
        debug!(seq, status = %record.status, "audit record appended");
        Ok(())
    }

    fn audit_len(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.audit_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}

impl AttendanceStore for LmdbEnvironment {
    fn commit_acceptance(&self, id: &TokenId, record: &AuditRecord) -> Result<bool, StoreError> {
        // LMDB allows one writer at a time, so read-check-write below is atomic.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if !self.mark_used_in(&mut wtxn, id)? {
            return Ok(false);
        }
        let seq = self.append_in(&mut wtxn, record)?;
        wtxn.commit().map_err(LmdbError::from)?;
        debug!(seq, token = %id, "acceptance committed");
        Ok(true)
    }
}
