//! Audit records describing verification attempts.

use crate::{EventKey, HolderKey, Nonce, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The temporal classification of a verification attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Presented at or before the token's nominal expiry.
    #[serde(rename = "on-time")]
    OnTime,
    /// Presented after expiry but inside the grace period.
    #[serde(rename = "late")]
    Late,
    /// Rejected; see the accompanying [`RejectionReason`].
    #[serde(rename = "failed")]
    Failed,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTime => "on-time",
            Self::Late => "late",
            Self::Failed => "failed",
        }
    }

    /// Whether this status represents an accepted presentation.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::OnTime | Self::Late)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a verification attempt was rejected.
///
/// These are expected business outcomes, never infrastructure faults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    HolderNotFound,
    EventNotFound,
    TokenInvalidOrUnknown,
    TokenAlreadyUsed,
    TokenExpired,
    InvalidSignature,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HolderNotFound => "HolderNotFound",
            Self::EventNotFound => "EventNotFound",
            Self::TokenInvalidOrUnknown => "TokenInvalidOrUnknown",
            Self::TokenAlreadyUsed => "TokenAlreadyUsed",
            Self::TokenExpired => "TokenExpired",
            Self::InvalidSignature => "InvalidSignature",
        }
    }

    /// Whether the rejection stems from an unresolved holder or event reference.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HolderNotFound | Self::EventNotFound)
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How presence was attested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMethod {
    /// A signed single-use presence token.
    Token,
}

/// One immutable entry in the append-only audit log.
///
/// Exactly one record exists per verification attempt, accepted or rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Absent when the presented holder key did not resolve.
    pub holder: Option<HolderKey>,
    /// Absent when the presented event key did not resolve.
    pub event: Option<EventKey>,
    pub nonce: Option<Nonce>,
    pub attempted_at: Timestamp,
    pub status: AttendanceStatus,
    /// Set only when `status` is [`AttendanceStatus::Failed`].
    pub reason: Option<RejectionReason>,
    pub method: ScanMethod,
}

impl AuditRecord {
    /// Record for an accepted presentation.
    pub fn accepted(
        holder: HolderKey,
        event: EventKey,
        nonce: Nonce,
        status: AttendanceStatus,
        attempted_at: Timestamp,
    ) -> Self {
        debug_assert!(status.is_accepted());
        Self {
            holder: Some(holder),
            event: Some(event),
            nonce: Some(nonce),
            attempted_at,
            status,
            reason: None,
            method: ScanMethod::Token,
        }
    }

    /// Record for a rejected presentation.
    pub fn rejected(
        holder: Option<HolderKey>,
        event: Option<EventKey>,
        nonce: Option<Nonce>,
        reason: RejectionReason,
        attempted_at: Timestamp,
    ) -> Self {
        Self {
            holder,
            event,
            nonce,
            attempted_at,
            status: AttendanceStatus::Failed,
            reason: Some(reason),
            method: ScanMethod::Token,
        }
    }
}
