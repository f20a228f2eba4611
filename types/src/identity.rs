//! Holder and event identifiers, and the records they resolve to.

use crate::{HolderSecret, Timestamp, TypeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum identifier length in bytes.
pub const MAX_KEY_LEN: usize = 128;

/// The field separator used when signing. Identifiers may not contain it.
pub const FIELD_SEPARATOR: char = '|';

fn validate_key(raw: &str) -> Result<(), TypeError> {
    if raw.is_empty() {
        return Err(TypeError::EmptyIdentifier);
    }
    if raw.len() > MAX_KEY_LEN {
        return Err(TypeError::IdentifierTooLong {
            len: raw.len(),
            max: MAX_KEY_LEN,
        });
    }
    if raw.contains(FIELD_SEPARATOR) {
        return Err(TypeError::ReservedSeparator);
    }
    Ok(())
}

/// Opaque identifier of a holder (for example a student matriculation number).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HolderKey(String);

impl HolderKey {
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        validate_key(&s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HolderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HolderKey {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<HolderKey> for String {
    fn from(key: HolderKey) -> Self {
        key.0
    }
}

/// Opaque identifier of an event (for example a scheduled lecture session).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventKey(String);

impl EventKey {
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        validate_key(&s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EventKey {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<EventKey> for String {
    fn from(key: EventKey) -> Self {
        key.0
    }
}

/// The party being attested as present.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderIdentity {
    pub key: HolderKey,
    pub secret: HolderSecret,
}

impl fmt::Debug for HolderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HolderIdentity")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// A bounded occasion at which presence can be attested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    pub key: EventKey,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

impl EventWindow {
    /// Whether `now` falls inside `[starts_at, ends_at]`.
    pub fn contains(&self, now: Timestamp) -> bool {
        self.starts_at <= now && now <= self.ends_at
    }
}
