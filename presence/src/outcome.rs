//! What a verification attempt receives and returns.

use rollcall_types::{AttendanceStatus, RejectionReason};
use serde::{Deserialize, Serialize};

/// The four fields a holder presents, exactly as scanned.
///
/// Fields are kept raw: a malformed value is a rejection to be audited, not
/// a parse error that would skip the audit log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub holder_key: String,
    pub event_key: String,
    pub nonce: String,
    pub signature: String,
}

/// The judgment on one presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Attendance recorded; `status` is on-time or late.
    Accepted { status: AttendanceStatus },
    /// Attendance denied.
    Rejected { reason: RejectionReason },
}

impl VerifyOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn status(&self) -> AttendanceStatus {
        match self {
            Self::Accepted { status } => *status,
            Self::Rejected { .. } => AttendanceStatus::Failed,
        }
    }

    pub fn reason(&self) -> Option<RejectionReason> {
        match self {
            Self::Accepted { .. } => None,
            Self::Rejected { reason } => Some(*reason),
        }
    }
}
