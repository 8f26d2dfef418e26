//! Atomic file writes.
//!
//! Content is written to a sibling temporary file, synced to disk, then renamed
//! over the target. A crash at any point leaves either the previous file or the
//! new one, never a truncated mix.

use super::dirs::ensure_dir;
use crate::core::{LauncherError, Result};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `content` to `path` atomically, creating the parent directory.
///
/// # Errors
///
/// Returns [`LauncherError::Storage`] naming the step and path that failed.
/// The temporary file is removed when the write or rename fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = temp_sibling(path);

    let written = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()
    })();

    if let Err(source) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(LauncherError::storage("write temporary file", temp_path, source));
    }

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(LauncherError::storage("replace", path, source));
    }

    Ok(())
}

/// `<dir>/<name>.tmp`, next to the target so the rename stays on one filesystem.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
