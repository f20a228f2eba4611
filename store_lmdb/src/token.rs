//! LMDB implementation of TokenStore.

use heed::RwTxn;
use rollcall_store::{StoreError, TokenStore};
use rollcall_types::{EventKey, HolderKey, Nonce, Token, TokenId};

use crate::{LmdbEnvironment, LmdbError};

impl LmdbEnvironment {
    pub(crate) fn read_token(
        &self,
        txn: &heed::RoTxn<'_>,
        id: &TokenId,
    ) -> Result<Option<Token>, LmdbError> {
        match self.tokens_db.get(txn, id.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    /// Flip `used` inside an open write transaction. Returns `false` when the
    /// token was already used; the caller decides whether to commit.
    pub(crate) fn mark_used_in(
        &self,
        wtxn: &mut RwTxn<'_>,
        id: &TokenId,
    ) -> Result<bool, LmdbError> {
        let mut token = self
            .read_token(wtxn, id)?
            .ok_or_else(|| LmdbError::NotFound(format!("token {id}")))?;
        if token.used {
            return Ok(false);
        }
        token.used = true;
        let bytes = bincode::serialize(&token)?;
        self.tokens_db.put(wtxn, id.as_bytes(), &bytes)?;
        Ok(true)
    }

    pub fn token_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.tokens_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}

impl TokenStore for LmdbEnvironment {
    fn save(&self, token: &Token) -> Result<(), StoreError> {
        let bytes = bincode::serialize(token).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .tokens_db
            .get(&wtxn, token.id.as_bytes())
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(token.id.to_string()));
        }
        self.tokens_db
            .put(&mut wtxn, token.id.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn find_by_nonce_holder_event(
        &self,
        nonce: &Nonce,
        holder: &HolderKey,
        event: &EventKey,
    ) -> Result<Option<Token>, StoreError> {
        let id = rollcall_crypto::token_id(nonce, holder, event);
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.read_token(&rtxn, &id)?)
    }

    fn mark_used_if_unused(&self, id: &TokenId) -> Result<bool, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let marked = self.mark_used_in(&mut wtxn, id)?;
        if marked {
            wtxn.commit().map_err(LmdbError::from)?;
        }
        Ok(marked)
    }
}
