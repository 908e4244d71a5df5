//! Ledger Store
//!
//! Durable JSON document holding identities, the code pool, and ban
//! snapshots. The store is the sole owner of the document lifecycle:
//! load, validate/repair on corruption, and atomic replace on save.
//!
//! Concurrency discipline: the document is read as a full snapshot and
//! written as a full replacement, so two interleaved read-modify-write
//! cycles would lose one writer's update. Every mutation therefore goes
//! through [`LedgerStore::update`], which holds the store-wide mutex for
//! the whole load→compute→save cycle. Read-only operations load without
//! the mutex; the rename-based save guarantees they never observe a
//! half-written file.

mod models;


use std::io::Write;
use std::path::{Path, PathBuf};

pub use models::{IdentityRecord, LedgerDocument};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

use crate::config::Config;

/// Storage-layer failure.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// File-backed document store.
pub struct LedgerStore {
    path: PathBuf,
    recover_on_corrupt: bool,
    write_lock: Mutex<()>,
}

impl LedgerStore {
    /// Create a store over the given file path. The file is created on the
    /// first mutating operation; a missing file loads as an empty document.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, recover_on_corrupt: bool) -> Self {
        Self {
            path: path.into(),
            recover_on_corrupt,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store from server configuration.
    #[must_use]
    pub fn open(config: &Config) -> Self {
        Self::new(&config.ledger_path, config.recover_on_corrupt)
    }

    /// Path of the durable document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current document.
    ///
    /// A missing file yields a fresh empty document. Unparseable content is
    /// replaced by a fresh empty document when `recover_on_corrupt` is set
    /// (the default); the discarded content is reported at warn level since
    /// this repair is lossy. With recovery disabled the parse error is
    /// surfaced as [`LedgerError::Corrupt`].
    pub async fn load(&self) -> Result<LedgerDocument, LedgerError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LedgerDocument::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(doc) => Ok(doc),
            Err(e) if self.recover_on_corrupt => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ledger document is corrupt; resetting to an empty document"
                );
                Ok(LedgerDocument::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Run one mutating operation as a critical section: load the document,
    /// apply `f`, and persist the result. The store-wide lock is held for
    /// the whole cycle so concurrent mutations cannot lose updates.
    ///
    /// The document is only written back if `f` actually changed it, so a
    /// closure that ends up making no change (empty pool, benign no-op)
    /// never touches disk.
    pub async fn update<T, F>(&self, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut LedgerDocument) -> T,
    {
        let _guard = self.write_lock.lock().await;

        let before = self.load().await?;
        let mut doc = before.clone();
        let out = f(&mut doc);

        if doc != before {
            self.save(&doc).await?;
        }

        Ok(out)
    }

    /// Serialize the full document and replace the durable copy atomically:
    /// write to a temp file in the same directory, then rename over the
    /// live path. No reader can observe a half-written document.
    async fn save(&self, doc: &LedgerDocument) -> Result<(), LedgerError> {
        let json = serde_json::to_vec_pretty(doc)?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}
