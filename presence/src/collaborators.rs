//! The external collaborators shared by the issuer and the verifier.

use rollcall_crypto::{NonceSource, OsNonceSource};
use rollcall_store::{AttendanceStore, EventDirectory, HolderDirectory};
use rollcall_types::{Clock, SystemClock};
use std::sync::Arc;

/// Handles to every boundary the presence core calls through.
#[derive(Clone)]
pub struct Collaborators {
    pub holders: Arc<dyn HolderDirectory>,
    pub events: Arc<dyn EventDirectory>,
    pub store: Arc<dyn AttendanceStore>,
    pub clock: Arc<dyn Clock>,
    pub nonces: Arc<dyn NonceSource>,
}

impl Collaborators {
    /// Wire every boundary to a single backend, using the system clock and
    /// the OS random source.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: HolderDirectory + EventDirectory + AttendanceStore + 'static,
    {
        Self {
            holders: store.clone(),
            events: store.clone(),
            store,
            clock: Arc::new(SystemClock),
            nonces: Arc::new(OsNonceSource),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_nonces(mut self, nonces: Arc<dyn NonceSource>) -> Self {
        self.nonces = nonces;
        self
    }
}
