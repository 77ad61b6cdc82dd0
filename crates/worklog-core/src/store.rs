//! Canonical worklog document plus its single backup slot.
//!
//! Layout under the data root:
//!   worklog.md         current document
//!   worklog.backup.md  text as it was before the last commit (absent when
//!                      there is nothing to undo)
//!
//! Both files are mirrored in memory when the store is opened, so reads never
//! touch the disk and never fail. All mutations go through one async mutex.

use crate::error::{Result, WorklogError};
use crate::io;
use crate::paths;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

/// Text a surface may show in place of an empty worklog.
pub const PLACEHOLDER: &str = "# Daily Work Log\n\nThis is your worklog file where daily achievements will be tracked and organized.\n";

#[derive(Debug)]
struct Slots {
    current: String,
    backup: Option<String>,
}

#[derive(Debug)]
pub struct WorklogStore {
    document_path: PathBuf,
    backup_path: PathBuf,
    slots: Mutex<Slots>,
}

impl WorklogStore {
    /// Open the store rooted at `root`. Nothing is created on disk until the
    /// first commit.
    pub fn open(root: &Path) -> Result<Self> {
        let document_path = paths::worklog_path(root);
        let backup_path = paths::backup_path(root);
        let current = io::read_optional(&document_path)?.unwrap_or_default();
        let backup = io::read_optional(&backup_path)?;
        Ok(Self {
            document_path,
            backup_path,
            slots: Mutex::new(Slots { current, backup }),
        })
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    /// Current document text; empty if nothing was ever committed.
    pub async fn read(&self) -> String {
        self.slots.lock().await.current.clone()
    }

    pub async fn has_backup(&self) -> bool {
        self.slots.lock().await.backup.is_some()
    }

    /// Text held in the backup slot, if any.
    pub async fn backup(&self) -> Option<String> {
        self.slots.lock().await.backup.clone()
    }

    pub async fn commit(&self, new_text: String) -> Result<()> {
        self.lock().await.commit(new_text)
    }

    pub async fn undo(&self) -> Result<String> {
        self.lock().await.undo()
    }

    /// Take exclusive access for a read-modify-write sequence. Other commits,
    /// undos and reads wait until the guard is dropped.
    pub async fn lock(&self) -> StoreGuard<'_> {
        StoreGuard {
            slots: self.slots.lock().await,
            document_path: &self.document_path,
            backup_path: &self.backup_path,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreGuard
// ---------------------------------------------------------------------------

pub struct StoreGuard<'a> {
    slots: MutexGuard<'a, Slots>,
    document_path: &'a Path,
    backup_path: &'a Path,
}

impl StoreGuard<'_> {
    pub fn text(&self) -> &str {
        &self.slots.current
    }

    pub fn has_backup(&self) -> bool {
        self.slots.backup.is_some()
    }

    /// Move the current text into the backup slot and replace the document
    /// with `new_text`.
    ///
    /// If the backup cannot be written nothing changes. If the document
    /// cannot be written the previous document stays in place and the backup
    /// slot is emptied.
    pub fn commit(&mut self, new_text: String) -> Result<()> {
        let previous = self.slots.current.clone();
        io::atomic_write(self.backup_path, previous.as_bytes())?;

        if let Err(e) = io::atomic_write(self.document_path, new_text.as_bytes()) {
            self.slots.backup = None;
            if let Err(cleanup) = io::remove_if_exists(self.backup_path) {
                warn!(error = %cleanup, "failed to discard backup after aborted commit");
            }
            return Err(e);
        }

        info!(
            previous_chars = previous.len(),
            new_chars = new_text.len(),
            "worklog committed"
        );
        self.slots.backup = Some(previous);
        self.slots.current = new_text;
        Ok(())
    }

    /// Restore the backup into the document and clear the slot.
    pub fn undo(&mut self) -> Result<String> {
        let Some(previous) = self.slots.backup.clone() else {
            return Err(WorklogError::NoPriorVersion);
        };
        io::atomic_write(self.document_path, previous.as_bytes())?;
        self.slots.current = previous.clone();
        // The document is already restored; the slot is cleared in memory even
        // if removing the file fails, so undo is never applied twice.
        self.slots.backup = None;
        io::remove_if_exists(self.backup_path)?;
        info!(restored_chars = previous.len(), "worklog restored from backup");
        Ok(previous)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
