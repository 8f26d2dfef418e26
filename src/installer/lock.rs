//! Cross-process update lock.
//!
//! Two launcher processes sharing one install directory must not extract into
//! it at the same time. The lock is an exclusive `fs4` lock on
//! `<install_dir>/.update.lock`, taken without waiting: if another process
//! holds it, the update is rejected with [`LauncherError::OperationInProgress`].
//!
//! The lock file itself is left in place when the lock is released. Deleting it
//! would let a process that opened the old file and a process that created a
//! new one both believe they hold the lock.

use crate::constants::UPDATE_LOCK_FILE;
use crate::core::{LauncherError, Result};
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Held for the duration of an install; released on drop.
#[derive(Debug)]
pub struct UpdateLock {
    _file: File,
    lock_path: PathBuf,
}

impl Drop for UpdateLock {
    fn drop(&mut self) {
        debug!(path = %self.lock_path.display(), "Update lock released");
    }
}

impl UpdateLock {
    /// Try to take the lock for `install_dir` without blocking.
    ///
    /// The install directory must exist.
    pub async fn try_acquire(install_dir: &Path) -> Result<Self> {
        let lock_path = install_dir.join(UPDATE_LOCK_FILE);

        let path = lock_path.clone();
        let outcome = tokio::task::spawn_blocking(move || -> std::io::Result<Option<File>> {
            let file = OpenOptions::new().create(true).write(true).truncate(false).open(&path)?;
            if file.try_lock_exclusive()? { Ok(Some(file)) } else { Ok(None) }
        })
        .await
        .map_err(|e| {
            LauncherError::storage("lock install directory", &lock_path, std::io::Error::other(e))
        })?
        .map_err(|source| LauncherError::storage("lock install directory", &lock_path, source))?;

        match outcome {
            Some(file) => {
                debug!(path = %lock_path.display(), "Update lock acquired");
                Ok(Self {
                    _file: file,
                    lock_path,
                })
            }
            None => {
                debug!(path = %lock_path.display(), "Update lock held by another process");
                Err(LauncherError::OperationInProgress)
            }
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}
