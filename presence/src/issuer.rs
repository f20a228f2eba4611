//! Token issuance.

use crate::{Collaborators, IssueError};
use rollcall_crypto::{sign_token, token_id};
use rollcall_types::{EventKey, HolderKey, Nonce, PresenceConfig, Timestamp, Token, TokenSignature};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What the caller receives after issuance. Never carries the holder secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub holder_key: HolderKey,
    pub event_key: EventKey,
    pub nonce: Nonce,
    pub signature: TokenSignature,
    pub expires_at: Timestamp,
}

/// Issues signed, time-bounded, single-use presence tokens.
pub struct Issuer {
    deps: Collaborators,
    config: PresenceConfig,
}

impl Issuer {
    pub fn new(deps: Collaborators, config: PresenceConfig) -> Self {
        Self { deps, config }
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    /// Issue a token for `holder` at `event` and persist it before returning.
    pub fn issue(&self, holder: &HolderKey, event: &EventKey) -> Result<IssuedToken, IssueError> {
        let _span = rollcall_utils::spans::issue_span(holder.as_str(), event.as_str()).entered();

        let identity = self
            .deps
            .holders
            .lookup_holder(holder)?
            .ok_or_else(|| IssueError::HolderNotFound(holder.clone()))?;
        let window = self
            .deps
            .events
            .lookup_event(event)?
            .ok_or_else(|| IssueError::EventNotFound(event.clone()))?;

        let now = self.deps.clock.now();
        if self.config.enforce_event_window && !window.contains(now) {
            warn!(%now, starts_at = %window.starts_at, ends_at = %window.ends_at, "issuance outside event window");
            return Err(IssueError::OutsideEventWindow(event.clone()));
        }

        let nonce = self.deps.nonces.next_nonce(self.config.nonce_bytes)?;
        let signature = sign_token(&identity.key, &window.key, &nonce, &identity.secret);
        let token = Token {
            id: token_id(&nonce, &identity.key, &window.key),
            nonce,
            holder: identity.key.clone(),
            event: window.key.clone(),
            signature,
            expires_at: now.plus_secs(self.config.validity_secs),
            used: false,
            created_at: now,
        };
        debug!(id = %token.id, "persisting token");
        self.deps.store.save(&token)?;

        info!(nonce = %token.nonce, expires_at = %token.expires_at, "token issued");
        Ok(IssuedToken {
            holder_key: token.holder,
            event_key: token.event,
            nonce: token.nonce,
            signature: token.signature,
            expires_at: token.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_nullables::{NullClock, NullNonceSource, NullStore};
    use rollcall_store::TokenStore;
    use rollcall_types::{EventWindow, HolderIdentity, HolderSecret};
    use std::sync::Arc;

    const T0: u64 = 1_700_000_000;

    fn setup(config: PresenceConfig) -> (Arc<NullStore>, Arc<NullClock>, Issuer) {
        let store = Arc::new(NullStore::new());
        store.add_holder(HolderIdentity {
            key: HolderKey::parse("S100").unwrap(),
            secret: HolderSecret::new(b"secret-100".to_vec()),
        });
        store.add_event(EventWindow {
            key: EventKey::parse("E1").unwrap(),
            starts_at: Timestamp::new(T0),
            ends_at: Timestamp::new(T0 + 3600),
        });
        let clock = Arc::new(NullClock::new(T0));
        let deps = Collaborators::from_store(store.clone())
            .with_clock(clock.clone())
            .with_nonces(Arc::new(NullNonceSource::counting()));
        (store, clock, Issuer::new(deps, config))
    }

    fn s100() -> HolderKey {
        HolderKey::parse("S100").unwrap()
    }

    fn e1() -> EventKey {
        EventKey::parse("E1").unwrap()
    }

    #[test]
    fn issues_and_persists_unused_token() {
        let (store, _clock, issuer) = setup(PresenceConfig::default());
        let issued = issuer.issue(&s100(), &e1()).unwrap();

        assert_eq!(issued.expires_at, Timestamp::new(T0 + 20));
        assert_eq!(issued.nonce.as_str(), "01".repeat(16));

        let token = store
            .find_by_nonce_holder_event(&issued.nonce, &s100(), &e1())
            .unwrap()
            .expect("token persisted");
        assert!(!token.used);
        assert_eq!(token.created_at, Timestamp::new(T0));
        assert_eq!(token.signature, issued.signature);
    }

    #[test]
    fn signature_matches_shared_signing_function() {
        let (_store, _clock, issuer) = setup(PresenceConfig::default());
        let issued = issuer.issue(&s100(), &e1()).unwrap();
        let expected = sign_token(
            &s100(),
            &e1(),
            &issued.nonce,
            &HolderSecret::new(b"secret-100".to_vec()),
        );
        assert_eq!(issued.signature, expected);
    }

    #[test]
    fn payload_never_contains_secret() {
        let (_store, _clock, issuer) = setup(PresenceConfig::default());
        let issued = issuer.issue(&s100(), &e1()).unwrap();
        let json = serde_json::to_string(&issued).unwrap();
        assert!(!json.contains("secret-100"));
        assert!(json.contains("\"holderKey\":\"S100\""));
        assert!(json.contains("\"expiresAt\""));
    }

    #[test]
    fn unknown_holder_is_not_found() {
        let (store, _clock, issuer) = setup(PresenceConfig::default());
        let err = issuer
            .issue(&HolderKey::parse("S999").unwrap(), &e1())
            .unwrap_err();
        assert!(matches!(err, IssueError::HolderNotFound(_)));
        assert!(err.is_not_found());
        assert_eq!(store.token_count(), 0);
    }

    #[test]
    fn unknown_event_is_not_found() {
        let (_store, _clock, issuer) = setup(PresenceConfig::default());
        let err = issuer
            .issue(&s100(), &EventKey::parse("E404").unwrap())
            .unwrap_err();
        assert!(matches!(err, IssueError::EventNotFound(_)));
    }

    #[test]
    fn each_issuance_gets_a_fresh_nonce() {
        let (store, _clock, issuer) = setup(PresenceConfig::default());
        let a = issuer.issue(&s100(), &e1()).unwrap();
        let b = issuer.issue(&s100(), &e1()).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.signature, b.signature);
        assert_eq!(store.token_count(), 2);
    }

    #[test]
    fn custom_validity_is_honoured() {
        let config = PresenceConfig {
            validity_secs: 45,
            ..Default::default()
        };
        let (_store, _clock, issuer) = setup(config);
        let issued = issuer.issue(&s100(), &e1()).unwrap();
        assert_eq!(issued.expires_at, Timestamp::new(T0 + 45));
    }

    #[test]
    fn event_window_enforced_when_enabled() {
        let config = PresenceConfig {
            enforce_event_window: true,
            ..Default::default()
        };
        let (_store, clock, issuer) = setup(config);
        assert!(issuer.issue(&s100(), &e1()).is_ok());
        clock.advance(3601);
        assert!(matches!(
            issuer.issue(&s100(), &e1()),
            Err(IssueError::OutsideEventWindow(_))
        ));
    }

    #[test]
    fn event_window_ignored_by_default() {
        let (_store, clock, issuer) = setup(PresenceConfig::default());
        clock.advance(10_000);
        assert!(issuer.issue(&s100(), &e1()).is_ok());
    }

    #[test]
    fn store_outage_surfaces_as_store_unavailable() {
        let (store, _clock, issuer) = setup(PresenceConfig::default());
        store.set_tokens_unavailable(true);
        assert!(matches!(
            issuer.issue(&s100(), &e1()),
            Err(IssueError::StoreUnavailable(_))
        ));
    }
}
