use rollcall_crypto::CryptoError;
use rollcall_store::StoreError;
use rollcall_types::{EventKey, HolderKey};
use thiserror::Error;

/// Why an issuance failed.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("holder {0} not found")]
    HolderNotFound(HolderKey),

    #[error("event {0} not found")]
    EventNotFound(EventKey),

    #[error("event {0} is not open for attendance")]
    OutsideEventWindow(EventKey),

    #[error("randomness unavailable: {0}")]
    Random(#[from] CryptoError),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl IssueError {
    /// Whether this is the `NotFound` class (an unresolved holder or event).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HolderNotFound(_) | Self::EventNotFound(_))
    }
}

impl From<StoreError> for IssueError {
    fn from(e: StoreError) -> Self {
        IssueError::StoreUnavailable(e.to_string())
    }
}

/// A fatal verification fault.
///
/// Business rejections are not errors; they are
/// [`VerifyOutcome::Rejected`](crate::VerifyOutcome::Rejected). This type
/// only signals that the attempt could not be judged and left no committed
/// audit record.
#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for PresenceError {
    fn from(e: StoreError) -> Self {
        PresenceError::StoreUnavailable(e.to_string())
    }
}
