//! Presence parameters: the tunable durations and sizes of the token lifecycle.

use crate::TypeError;
use serde::{Deserialize, Serialize};

/// Minimum nonce entropy in bytes.
pub const MIN_NONCE_BYTES: usize = 16;

/// Tunable presence parameters, overridable per deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Seconds between issuance and nominal expiry.
    /// Kept short so a token is hard to relay to someone not in the room.
    pub validity_secs: u64,

    /// Seconds after expiry during which a token is still accepted as late.
    pub grace_secs: u64,

    /// Random bytes per nonce.
    pub nonce_bytes: usize,

    /// Refuse issuance outside the event's `[starts_at, ends_at]` window.
    pub enforce_event_window: bool,
}

impl PresenceConfig {
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.validity_secs == 0 {
            return Err(TypeError::InvalidConfig(
                "validity_secs must be greater than zero".into(),
            ));
        }
        if self.nonce_bytes < MIN_NONCE_BYTES {
            return Err(TypeError::InvalidConfig(format!(
                "nonce_bytes must be at least {MIN_NONCE_BYTES}, got {}",
                self.nonce_bytes
            )));
        }
        Ok(())
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            validity_secs: 20,
            grace_secs: 60,
            nonce_bytes: MIN_NONCE_BYTES,
            enforce_event_window: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = PresenceConfig::default();
        assert_eq!(cfg.validity_secs, 20);
        assert_eq!(cfg.grace_secs, 60);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_short_nonce() {
        let cfg = PresenceConfig {
            nonce_bytes: 8,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_validity() {
        let cfg = PresenceConfig {
            validity_secs: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
