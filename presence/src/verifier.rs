//! Token verification.
//!
//! Each call is one terminal judgment:
//! resolve references → locate token → used? → within grace? → signature →
//! classify and commit. Every judgment, accepted or rejected, appends
//! exactly one audit record. A store fault aborts the attempt instead.

use crate::{Collaborators, PresenceError, Presentation, VerifyOutcome};
use rollcall_crypto::verify_token_signature;
use rollcall_types::{
    AttendanceStatus, AuditRecord, EventKey, EventWindow, HolderIdentity, HolderKey, Nonce,
    PresenceConfig, RejectionReason, Timestamp, TokenSignature,
};
use tracing::{error, info, warn};

/// Verifies presented tokens, accepting each at most once.
pub struct Verifier {
    deps: Collaborators,
    config: PresenceConfig,
}

impl Verifier {
    pub fn new(deps: Collaborators, config: PresenceConfig) -> Self {
        Self { deps, config }
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    /// Judge one presentation.
    ///
    /// Returns `Err` only when a store could not be reached; in that case no
    /// audit record was committed and the token was not consumed.
    pub fn verify(&self, presentation: &Presentation) -> Result<VerifyOutcome, PresenceError> {
        let _span = rollcall_utils::spans::verify_span(
            &presentation.holder_key,
            &presentation.event_key,
            &presentation.nonce,
        )
        .entered();

        self.judge(presentation).inspect_err(|e| {
            error!(error = %e, "verification aborted");
        })
    }

    fn judge(&self, presentation: &Presentation) -> Result<VerifyOutcome, PresenceError> {
        let now = self.deps.clock.now();
        let nonce = Nonce::new(presentation.nonce.clone());

        let holder = self.resolve_holder(&presentation.holder_key)?;
        let event = self.resolve_event(&presentation.event_key)?;
        let (holder, event) = match (holder, event) {
            (Some(holder), Some(event)) => (holder, event),
            (None, event) => {
                return self.reject(
                    None,
                    event.map(|e| e.key),
                    nonce,
                    RejectionReason::HolderNotFound,
                    now,
                );
            }
            (Some(holder), None) => {
                return self.reject(
                    Some(holder.key.clone()),
                    None,
                    nonce,
                    RejectionReason::EventNotFound,
                    now,
                );
            }
        };
        let holder_key = holder.key.clone();
        let event_key = event.key.clone();

        let Some(token) = self
            .deps
            .store
            .find_by_nonce_holder_event(&nonce, &holder_key, &event_key)?
        else {
            return self.reject(
                Some(holder_key),
                Some(event_key),
                nonce,
                RejectionReason::TokenInvalidOrUnknown,
                now,
            );
        };

        // Used is checked first: a replayed token that has also expired is a replay.
        if token.used {
            return self.reject(
                Some(holder_key),
                Some(event_key),
                nonce,
                RejectionReason::TokenAlreadyUsed,
                now,
            );
        }

        if now > token.grace_deadline(self.config.grace_secs) {
            return self.reject(
                Some(holder_key),
                Some(event_key),
                nonce,
                RejectionReason::TokenExpired,
                now,
            );
        }

        if !self.signature_matches(&holder, &event_key, &nonce, &presentation.signature) {
            // Not burned: the holder may present again with the correct signature.
            return self.reject(
                Some(holder_key),
                Some(event_key),
                nonce,
                RejectionReason::InvalidSignature,
                now,
            );
        }

        let status = if token.is_on_time(now) {
            AttendanceStatus::OnTime
        } else {
            AttendanceStatus::Late
        };
        let record = AuditRecord::accepted(
            holder_key.clone(),
            event_key.clone(),
            nonce.clone(),
            status,
            now,
        );
        if !self.deps.store.commit_acceptance(&token.id, &record)? {
            // Lost the race to a concurrent presentation of the same token.
            return self.reject(
                Some(holder_key),
                Some(event_key),
                nonce,
                RejectionReason::TokenAlreadyUsed,
                now,
            );
        }

        info!(%status, "attendance accepted");
        Ok(VerifyOutcome::Accepted { status })
    }

    fn resolve_holder(&self, raw: &str) -> Result<Option<HolderIdentity>, PresenceError> {
        match HolderKey::parse(raw) {
            Ok(key) => Ok(self.deps.holders.lookup_holder(&key)?),
            Err(_) => Ok(None),
        }
    }

    fn resolve_event(&self, raw: &str) -> Result<Option<EventWindow>, PresenceError> {
        match EventKey::parse(raw) {
            Ok(key) => Ok(self.deps.events.lookup_event(&key)?),
            Err(_) => Ok(None),
        }
    }

    fn signature_matches(
        &self,
        holder: &HolderIdentity,
        event: &EventKey,
        nonce: &Nonce,
        presented: &str,
    ) -> bool {
        match TokenSignature::from_hex(presented) {
            Ok(sig) => verify_token_signature(&holder.key, event, nonce, &holder.secret, &sig),
            Err(_) => false,
        }
    }

    fn reject(
        &self,
        holder: Option<HolderKey>,
        event: Option<EventKey>,
        nonce: Nonce,
        reason: RejectionReason,
        now: Timestamp,
    ) -> Result<VerifyOutcome, PresenceError> {
        let record = AuditRecord::rejected(holder, event, Some(nonce), reason, now);
        self.deps.store.append(&record)?;
        warn!(%reason, "attendance rejected");
        Ok(VerifyOutcome::Rejected { reason })
    }
}
