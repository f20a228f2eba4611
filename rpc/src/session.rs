//! Scanner-side session policy.
//!
//! A [`ScanSession`] wraps whatever submits presentations to the verifier and
//! keeps per-session state explicit: which holders were already accepted in
//! this session, and how many consecutive attempts have failed.

use std::collections::HashSet;
use std::future::Future;

use rollcall_presence::Presentation;
use rollcall_types::{AttendanceStatus, RejectionReason};
use tracing::{info, warn};

use crate::error::ClientError;
use crate::handlers::VerifyResponse;

/// Consecutive failures allowed before asking for an administrator.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Sends one presentation to the verifier.
pub trait Submit {
    fn submit(
        &self,
        presentation: &Presentation,
    ) -> impl Future<Output = Result<VerifyResponse, ClientError>> + Send;
}

/// What the scanner should show after one scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanResult {
    Accepted(AttendanceStatus),
    /// The holder was already accepted earlier in this session; the
    /// verifier was not contacted.
    Duplicate,
    Rejected {
        reason: RejectionReason,
        attempts_left: u32,
    },
    /// Too many consecutive failures. The counter has been reset.
    ContactAdministrator { reason: RejectionReason },
}

pub struct ScanSession<S> {
    submitter: S,
    max_attempts: u32,
    failures: u32,
    accepted: HashSet<String>,
}

impl<S: Submit> ScanSession<S> {
    pub fn new(submitter: S) -> Self {
        Self::with_max_attempts(submitter, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(submitter: S, max_attempts: u32) -> Self {
        Self {
            submitter,
            max_attempts: max_attempts.max(1),
            failures: 0,
            accepted: HashSet::new(),
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Process one scan.
    ///
    /// Transport errors are returned as-is and do not count as failures.
    pub async fn scan(&mut self, presentation: &Presentation) -> Result<ScanResult, ClientError> {
        if self.accepted.contains(&presentation.holder_key) {
            info!(holder = %presentation.holder_key, "duplicate scan in session");
            return Ok(ScanResult::Duplicate);
        }

        let response = self.submitter.submit(presentation).await?;

        if response.accepted {
            let status = response.status.ok_or_else(|| {
                ClientError::InvalidResponse("acceptance without a status".to_string())
            })?;
            self.failures = 0;
            self.accepted.insert(presentation.holder_key.clone());
            return Ok(ScanResult::Accepted(status));
        }

        let reason = response.reason.ok_or_else(|| {
            ClientError::InvalidResponse("rejection without a reason".to_string())
        })?;
        self.failures += 1;
        if self.failures >= self.max_attempts {
            warn!(failures = self.failures, %reason, "scan retries exhausted");
            self.failures = 0;
            return Ok(ScanResult::ContactAdministrator { reason });
        }
        Ok(ScanResult::Rejected {
            reason,
            attempts_left: self.max_attempts - self.failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted responses and counts calls.
    struct Scripted {
        replies: Mutex<VecDeque<Result<VerifyResponse, ClientError>>>,
        calls: Mutex<u32>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<VerifyResponse, ClientError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl Submit for &Scripted {
        async fn submit(&self, _: &Presentation) -> Result<VerifyResponse, ClientError> {
            *self.calls.lock().unwrap() += 1;
            self.replies.lock().unwrap().pop_front().unwrap()
        }
    }

    fn ok(status: AttendanceStatus) -> Result<VerifyResponse, ClientError> {
        Ok(VerifyResponse {
            accepted: true,
            status: Some(status),
            reason: None,
        })
    }

    fn no(reason: RejectionReason) -> Result<VerifyResponse, ClientError> {
        Ok(VerifyResponse {
            accepted: false,
            status: None,
            reason: Some(reason),
        })
    }

    fn scan_of(holder: &str) -> Presentation {
        Presentation {
            holder_key: holder.into(),
            event_key: "E1".into(),
            nonce: "aa".into(),
            signature: "bb".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_holder_is_not_resubmitted() {
        let script = Scripted::new(vec![ok(AttendanceStatus::OnTime)]);
        let mut session = ScanSession::new(&script);

        assert_eq!(
            session.scan(&scan_of("S100")).await.unwrap(),
            ScanResult::Accepted(AttendanceStatus::OnTime)
        );
        assert_eq!(session.scan(&scan_of("S100")).await.unwrap(), ScanResult::Duplicate);
        assert_eq!(script.calls(), 1);
        assert_eq!(session.accepted_count(), 1);
    }

    #[tokio::test]
    async fn third_failure_asks_for_administrator_and_resets() {
        let script = Scripted::new(vec![
            no(RejectionReason::InvalidSignature),
            no(RejectionReason::InvalidSignature),
            no(RejectionReason::TokenExpired),
            no(RejectionReason::InvalidSignature),
        ]);
        let mut session = ScanSession::new(&script);
        let p = scan_of("S100");

        assert_eq!(
            session.scan(&p).await.unwrap(),
            ScanResult::Rejected { reason: RejectionReason::InvalidSignature, attempts_left: 2 }
        );
        assert_eq!(
            session.scan(&p).await.unwrap(),
            ScanResult::Rejected { reason: RejectionReason::InvalidSignature, attempts_left: 1 }
        );
        assert_eq!(
            session.scan(&p).await.unwrap(),
            ScanResult::ContactAdministrator { reason: RejectionReason::TokenExpired }
        );
        assert_eq!(session.failures(), 0);
        assert_eq!(
            session.scan(&p).await.unwrap(),
            ScanResult::Rejected { reason: RejectionReason::InvalidSignature, attempts_left: 2 }
        );
    }

    #[tokio::test]
    async fn success_resets_failures() {
        let script = Scripted::new(vec![
            no(RejectionReason::InvalidSignature),
            ok(AttendanceStatus::Late),
        ]);
        let mut session = ScanSession::new(&script);
        session.scan(&scan_of("S100")).await.unwrap();
        assert_eq!(session.failures(), 1);
        assert_eq!(
            session.scan(&scan_of("S100")).await.unwrap(),
            ScanResult::Accepted(AttendanceStatus::Late)
        );
        assert_eq!(session.failures(), 0);
    }

    #[tokio::test]
    async fn transport_errors_do_not_count() {
        let script = Scripted::new(vec![Err(ClientError::Unreachable("down".into()))]);
        let mut session = ScanSession::new(&script);
        assert!(session.scan(&scan_of("S100")).await.is_err());
        assert_eq!(session.failures(), 0);
    }
}
