//! Nullable store: thread-safe in-memory storage for testing.

use rollcall_store::{
    AttendanceStore, AuditLog, EventDirectory, HolderDirectory, StoreError, TokenStore,
};
use rollcall_types::{
    AuditRecord, EventKey, EventWindow, HolderIdentity, HolderKey, Nonce, Token, TokenId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct State {
    holders: HashMap<HolderKey, HolderIdentity>,
    events: HashMap<EventKey, EventWindow>,
    tokens: HashMap<TokenId, Token>,
    audit: Vec<AuditRecord>,
}

/// An in-memory holder + event + token + audit store for testing.
///
/// Tokens and the audit log live under one lock, so `commit_acceptance` is
/// a single critical section. Outages can be simulated per concern.
#[derive(Default)]
pub struct NullStore {
    state: Mutex<State>,
    tokens_down: AtomicBool,
    audit_down: AtomicBool,
    directory_down: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Register a holder identity.
    pub fn add_holder(&self, identity: HolderIdentity) {
        self.state().holders.insert(identity.key.clone(), identity);
    }

    /// Register an event window.
    pub fn add_event(&self, window: EventWindow) {
        self.state().events.insert(window.key.clone(), window);
    }

    /// Simulate the token store being unreachable.
    pub fn set_tokens_unavailable(&self, down: bool) {
        self.tokens_down.store(down, Ordering::SeqCst);
    }

    /// Simulate the audit log being unreachable.
    pub fn set_audit_unavailable(&self, down: bool) {
        self.audit_down.store(down, Ordering::SeqCst);
    }

    /// Simulate the holder/event directories being unreachable.
    pub fn set_directory_unavailable(&self, down: bool) {
        self.directory_down.store(down, Ordering::SeqCst);
    }

    /// Snapshot of every audit record, in append order.
    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.state().audit.clone()
    }

    /// Look up a stored token by id (for assertions).
    pub fn token(&self, id: &TokenId) -> Option<Token> {
        self.state().tokens.get(id).cloned()
    }

    pub fn token_count(&self) -> usize {
        self.state().tokens.len()
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Backend(format!("{what} unavailable")))
        } else {
            Ok(())
        }
    }
}

impl HolderDirectory for NullStore {
    fn lookup_holder(&self, key: &HolderKey) -> Result<Option<HolderIdentity>, StoreError> {
        Self::check(&self.directory_down, "holder directory")?;
        Ok(self.state().holders.get(key).cloned())
    }
}

impl EventDirectory for NullStore {
    fn lookup_event(&self, key: &EventKey) -> Result<Option<EventWindow>, StoreError> {
        Self::check(&self.directory_down, "event directory")?;
        Ok(self.state().events.get(key).cloned())
    }
}

impl TokenStore for NullStore {
    fn save(&self, token: &Token) -> Result<(), StoreError> {
        Self::check(&self.tokens_down, "token store")?;
        let mut state = self.state();
        if state.tokens.contains_key(&token.id) {
            return Err(StoreError::Duplicate(token.id.to_string()));
        }
        state.tokens.insert(token.id, token.clone());
        Ok(())
    }

    fn find_by_nonce_holder_event(
        &self,
        nonce: &Nonce,
        holder: &HolderKey,
        event: &EventKey,
    ) -> Result<Option<Token>, StoreError> {
        Self::check(&self.tokens_down, "token store")?;
        let id = rollcall_crypto::token_id(nonce, holder, event);
        Ok(self.state().tokens.get(&id).cloned())
    }

    fn mark_used_if_unused(&self, id: &TokenId) -> Result<bool, StoreError> {
        Self::check(&self.tokens_down, "token store")?;
        let mut state = self.state();
        let token = state
            .tokens
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if token.used {
            return Ok(false);
        }
        token.used = true;
        Ok(true)
    }
}

impl AuditLog for NullStore {
    fn append(&self, record: &AuditRecord) -> Result<(), StoreError> {
        Self::check(&self.audit_down, "audit log")?;
        self.state().audit.push(record.clone());
        Ok(())
    }

    fn audit_len(&self) -> Result<u64, StoreError> {
        Self::check(&self.audit_down, "audit log")?;
        Ok(self.state().audit.len() as u64)
    }
}

impl AttendanceStore for NullStore {
    fn commit_acceptance(&self, id: &TokenId, record: &AuditRecord) -> Result<bool, StoreError> {
        Self::check(&self.tokens_down, "token store")?;
        Self::check(&self.audit_down, "audit log")?;
        let mut state = self.state();
        let token = state
            .tokens
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if token.used {
            return Ok(false);
        }
        token.used = true;
        state.audit.push(record.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_types::{
        AttendanceStatus, HolderSecret, RejectionReason, Timestamp, TokenSignature,
    };

    fn test_token() -> Token {
        let nonce = Nonce::new("aabb");
        let holder = HolderKey::parse("S100").unwrap();
        let event = EventKey::parse("E1").unwrap();
        Token {
            id: rollcall_crypto::token_id(&nonce, &holder, &event),
            nonce,
            holder,
            event,
            signature: TokenSignature::new([1u8; 32]),
            expires_at: Timestamp::new(1020),
            used: false,
            created_at: Timestamp::new(1000),
        }
    }

    fn accepted_record(token: &Token) -> AuditRecord {
        AuditRecord::accepted(
            token.holder.clone(),
            token.event.clone(),
            token.nonce.clone(),
            AttendanceStatus::OnTime,
            Timestamp::new(1005),
        )
    }

    #[test]
    fn save_and_find() {
        let store = NullStore::new();
        let token = test_token();
        store.save(&token).unwrap();
        let found = store
            .find_by_nonce_holder_event(&token.nonce, &token.holder, &token.event)
            .unwrap();
        assert_eq!(found, Some(token));
    }

    #[test]
    fn duplicate_save_rejected() {
        let store = NullStore::new();
        let token = test_token();
        store.save(&token).unwrap();
        assert!(matches!(store.save(&token), Err(StoreError::Duplicate(_))));
    }

    #[test]
    fn mark_used_is_one_shot() {
        let store = NullStore::new();
        let token = test_token();
        store.save(&token).unwrap();
        assert!(store.mark_used_if_unused(&token.id).unwrap());
        assert!(!store.mark_used_if_unused(&token.id).unwrap());
        assert!(store.token(&token.id).unwrap().used);
    }

    #[test]
    fn commit_acceptance_appends_only_once() {
        let store = NullStore::new();
        let token = test_token();
        store.save(&token).unwrap();
        let record = accepted_record(&token);
        assert!(store.commit_acceptance(&token.id, &record).unwrap());
        assert!(!store.commit_acceptance(&token.id, &record).unwrap());
        assert_eq!(store.audit_records().len(), 1);
    }

    #[test]
    fn audit_outage_leaves_token_unused() {
        let store = NullStore::new();
        let token = test_token();
        store.save(&token).unwrap();
        store.set_audit_unavailable(true);
        assert!(store
            .commit_acceptance(&token.id, &accepted_record(&token))
            .is_err());
        assert!(!store.token(&token.id).unwrap().used);
    }

    #[test]
    fn directory_lookup() {
        let store = NullStore::new();
        let key = HolderKey::parse("S100").unwrap();
        assert!(store.lookup_holder(&key).unwrap().is_none());
        store.add_holder(HolderIdentity {
            key: key.clone(),
            secret: HolderSecret::new(b"s".to_vec()),
        });
        assert!(store.lookup_holder(&key).unwrap().is_some());
        store.set_directory_unavailable(true);
        assert!(store.lookup_holder(&key).is_err());
    }

    #[test]
    fn append_rejection() {
        let store = NullStore::new();
        store
            .append(&AuditRecord::rejected(
                None,
                None,
                None,
                RejectionReason::HolderNotFound,
                Timestamp::new(1),
            ))
            .unwrap();
        assert_eq!(store.audit_len().unwrap(), 1);
    }
}
