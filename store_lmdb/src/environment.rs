//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use tracing::info;

use crate::LmdbError;

/// Number of named databases in the environment.
const MAX_DBS: u32 = 5;

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// Wraps the LMDB environment and all database handles.
///
/// Cloning is cheap; every clone shares the same environment. The struct
/// implements `HolderDirectory`, `EventDirectory`, `TokenStore`, `AuditLog`
/// and `AttendanceStore`.
#[derive(Clone)]
pub struct LmdbEnvironment {
    pub(crate) env: Arc<Env>,
    /// HolderKey → bincode(HolderIdentity)
    pub(crate) holders_db: Database<Bytes, Bytes>,
    /// EventKey → bincode(EventWindow)
    pub(crate) events_db: Database<Bytes, Bytes>,
    /// TokenId → bincode(Token)
    pub(crate) tokens_db: Database<Bytes, Bytes>,
    /// big-endian u64 sequence → bincode(AuditRecord)
    pub(crate) audit_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment in the directory `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the directory is opened once per process; rollcall never
        // opens the same environment twice concurrently.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let holders_db = env.create_database(&mut wtxn, Some("holders"))?;
        let events_db = env.create_database(&mut wtxn, Some("events"))?;
        let tokens_db = env.create_database(&mut wtxn, Some("tokens"))?;
        let audit_db = env.create_database(&mut wtxn, Some("audit"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        info!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            holders_db,
            events_db,
            tokens_db,
            audit_db,
            meta_db,
        })
    }

    /// The underlying heed environment.
    pub fn env(&self) -> &Env {
        &self.env
    }
}
