// Persistence adapter: pool state <-> expiring key-value entry, and
// pool state <-> portable export file.

use std::path::Path;

use anyhow::Context;
use chrono::Duration;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::db::Database;
use crate::pool::document::{self, ImportError, PoolDocument};
use crate::pool::PoolState;

/// Backing store for the pool between sessions.
///
/// Neither operation may fail from the caller's point of view: a write
/// failure is logged and dropped, and any read problem reads as "nothing
/// saved".
pub trait StateStore {
    fn save(&self, state: &PoolState);
    fn load(&self) -> Option<PoolState>;
}

/// [`StateStore`] over the SQLite key-value table.
pub struct Persistence {
    db: Database,
    key: String,
    ttl: Duration,
}

impl Persistence {
    pub fn new(db: Database, key: impl Into<String>, expiry_days: u32) -> Self {
        Persistence {
            db,
            key: key.into(),
            ttl: Duration::days(i64::from(expiry_days)),
        }
    }

    /// Open the configured database (creating its directory if needed) and
    /// drop entries that expired while the app was closed.
    pub fn open(storage: &StorageConfig) -> anyhow::Result<Self> {
        let path = storage
            .resolve_db_path()
            .context("failed to resolve database path")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let path_str = utf8_path(&path)?;
        let db = Database::open(path_str)?;
        info!("Database opened at {}", path_str);

        match db.purge_expired() {
            Ok(0) => {}
            Ok(n) => info!("Purged {} expired entries", n),
            Err(e) => warn!("Failed to purge expired entries: {:#}", e),
        }

        Ok(Self::new(db, storage.state_key.clone(), storage.expiry_days))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// SQLite takes the path as UTF-8; refuse rather than open a lossy lookalike.
fn utf8_path(path: &Path) -> anyhow::Result<&str> {
    path.to_str()
        .with_context(|| format!("database path is not valid UTF-8: {}", path.display()))
}

impl StateStore for Persistence {
    fn save(&self, state: &PoolState) {
        let payload = document::to_compact_string(&PoolDocument::from(state));
        match self.db.put(&self.key, &payload, self.ttl) {
            Ok(()) => debug!(
                "Saved pool ({} available, {} picked)",
                state.available.len(),
                state.picked.len()
            ),
            Err(e) => warn!("Failed to save pool state: {:#}", e),
        }
    }

    fn load(&self) -> Option<PoolState> {
        let raw = match self.db.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read saved pool state: {:#}", e);
                return None;
            }
        };
        match document::from_slice(raw.as_bytes()) {
            Ok(doc) => Some(doc.into()),
            Err(e) => {
                warn!("Ignoring malformed saved pool state: {}", e);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Export / import files
// ---------------------------------------------------------------------------

/// Write `doc` to `path` as two-space indented JSON.
pub fn export_to_file(path: &Path, doc: &PoolDocument) -> std::io::Result<()> {
    std::fs::write(path, document::to_pretty_bytes(doc))
}

/// Read an export file as a loose JSON value. Field checks happen when the
/// value is handed to the pool.
pub fn read_document(path: &Path) -> Result<Value, ImportError> {
    let bytes = std::fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}
