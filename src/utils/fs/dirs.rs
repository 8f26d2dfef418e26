//! Directory creation helpers.

use crate::core::{LauncherError, Result};
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and all parents if necessary.
///
/// Idempotent. Fails when the path exists but is not a directory.
///
/// # Examples
///
/// ```rust,no_run
/// use kcdmod_launcher::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> kcdmod_launcher::core::Result<()> {
/// ensure_dir(Path::new("/tmp/kcdmod"))?;
/// ensure_dir(Path::new("/tmp/kcdmod"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|source| LauncherError::storage("create directory", path, source))?;
    } else if !path.is_dir() {
        return Err(LauncherError::storage(
            "create directory",
            path,
            std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "path exists but is not a directory",
            ),
        ));
    }
    Ok(())
}
