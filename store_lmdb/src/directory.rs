//! LMDB implementation of HolderDirectory and EventDirectory, plus the
//! enrollment writes that populate them.

use rollcall_store::{EventDirectory, HolderDirectory, StoreError};
use rollcall_types::{EventKey, EventWindow, HolderIdentity, HolderKey};

use crate::{LmdbEnvironment, LmdbError};

impl LmdbEnvironment {
    /// Enroll or replace a holder.
    pub fn put_holder(&self, identity: &HolderIdentity) -> Result<(), StoreError> {
        let bytes = bincode::serialize(identity).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.holders_db
            .put(&mut wtxn, identity.key.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    /// Create or replace an event window.
    pub fn put_event(&self, window: &EventWindow) -> Result<(), StoreError> {
        let bytes = bincode::serialize(window).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.events_db
            .put(&mut wtxn, window.key.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    pub fn holder_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.holders_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    pub fn event_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.events_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}

impl HolderDirectory for LmdbEnvironment {
    fn lookup_holder(&self, key: &HolderKey) -> Result<Option<HolderIdentity>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let Some(bytes) = self
            .holders_db
            .get(&rtxn, key.as_str().as_bytes())
            .map_err(LmdbError::from)?
        else {
            return Ok(None);
        };
        let identity = bincode::deserialize(bytes).map_err(LmdbError::from)?;
        Ok(Some(identity))
    }
}

impl EventDirectory for LmdbEnvironment {
    fn lookup_event(&self, key: &EventKey) -> Result<Option<EventWindow>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let Some(bytes) = self
            .events_db
            .get(&rtxn, key.as_str().as_bytes())
            .map_err(LmdbError::from)?
        else {
            return Ok(None);
        };
        let window = bincode::deserialize(bytes).map_err(LmdbError::from)?;
        Ok(Some(window))
    }
}
