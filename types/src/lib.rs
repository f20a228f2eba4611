//! Fundamental types for rollcall.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! holder and event identifiers, holder secrets, presence tokens, audit records,
//! timestamps, and the tunable presence parameters.

pub mod audit;
pub mod error;
pub mod hash;
pub mod identity;
pub mod keys;
pub mod params;
pub mod time;
pub mod token;

pub use audit::{AttendanceStatus, AuditRecord, RejectionReason, ScanMethod};
pub use error::TypeError;
pub use hash::{Nonce, TokenId, TokenSignature};
pub use identity::{EventKey, EventWindow, HolderIdentity, HolderKey};
pub use keys::HolderSecret;
pub use params::PresenceConfig;
pub use time::{Clock, SystemClock, Timestamp};
pub use token::Token;
