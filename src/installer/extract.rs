//! ZIP extraction into the install directory.
//!
//! Entries are written over whatever is already there. Entries whose names
//! would land outside the install directory (absolute paths, `..`) are skipped
//! with a warning, as are entries that would replace the launcher's own
//! bookkeeping files at the top level.

use crate::constants::{UPDATE_LOCK_FILE, VERSION_FILE};
use crate::core::{LauncherError, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::ZipArchive;

const STAGE: &str = "extract";

/// What an extraction did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub directories: usize,
    pub skipped: usize,
}

/// Extract every entry of `archive_path` into `dest`.
///
/// Blocking; async callers go through [`extract_in_background`].
///
/// # Errors
///
/// [`LauncherError::Install`] when the archive is unreadable or an entry
/// cannot be written. Files extracted before the failure stay in place.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<ExtractSummary> {
    let file = File::open(archive_path).map_err(|e| {
        LauncherError::install(STAGE, format!("cannot open {}: {e}", archive_path.display()))
    })?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| LauncherError::install(STAGE, format!("not a valid ZIP archive: {e}")))?;

    fs::create_dir_all(dest).map_err(|e| {
        LauncherError::install(STAGE, format!("cannot create {}: {e}", dest.display()))
    })?;

    let mut summary = ExtractSummary::default();

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| LauncherError::install(STAGE, format!("cannot read entry {i}: {e}")))?;

        let Some(name) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "Skipping archive entry outside the install directory");
            summary.skipped += 1;
            continue;
        };

        if is_reserved(&name) {
            warn!(entry = %name.display(), "Skipping archive entry that shadows launcher state");
            summary.skipped += 1;
            continue;
        }

        let target = dest.join(&name);
        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| write_error(&target, &e))?;
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| write_error(parent, &e))?;
        }
        let mut outfile = File::create(&target).map_err(|e| write_error(&target, &e))?;
        io::copy(&mut entry, &mut outfile).map_err(|e| write_error(&target, &e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o7777))
                    .map_err(|e| write_error(&target, &e))?;
            }
        }

        summary.files += 1;
    }

    debug!(
        dest = %dest.display(),
        files = summary.files,
        directories = summary.directories,
        skipped = summary.skipped,
        "Archive extracted"
    );
    Ok(summary)
}

/// Run [`extract_archive`] on the blocking pool.
pub async fn extract_in_background(archive_path: PathBuf, dest: PathBuf) -> Result<ExtractSummary> {
    tokio::task::spawn_blocking(move || extract_archive(&archive_path, &dest))
        .await
        .map_err(|e| LauncherError::install(STAGE, format!("extraction task failed: {e}")))?
}

fn is_reserved(name: &Path) -> bool {
    name == Path::new(VERSION_FILE) || name == Path::new(UPDATE_LOCK_FILE)
}

fn write_error(path: &Path, error: &io::Error) -> LauncherError {
    LauncherError::install(STAGE, format!("cannot write {}: {error}", path.display()))
}
