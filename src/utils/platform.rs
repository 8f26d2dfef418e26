//! Platform-specific directory lookups and path expansion.
//!
//! The launcher installs into the per-user application data directory and puts
//! its shortcut on the desktop. Both are resolved with the `dirs` crate so the
//! usual platform conventions apply:
//!
//! | Location | Windows | macOS | Linux |
//! |----------|---------|-------|-------|
//! | data dir | `%APPDATA%` | `~/Library/Application Support` | `$XDG_DATA_HOME` or `~/.local/share` |
//! | desktop | `%USERPROFILE%\Desktop` | `~/Desktop` | `$XDG_DESKTOP_DIR` or `~/Desktop` |
//!
//! Failures are reported as [`LauncherError::Configuration`] since they can be
//! fixed by setting `product.install_dir` or `update.shortcut_dir`.

use crate::core::{LauncherError, Result};
use std::path::PathBuf;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// The user's home directory.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "check that the USERPROFILE environment variable is set"
        } else {
            "check that the HOME environment variable is set"
        };
        LauncherError::config(format!("could not determine home directory; {platform_help}"))
    })
}

/// The per-user application data root (not including the product name).
pub fn get_data_dir() -> Result<PathBuf> {
    dirs::data_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "check that the APPDATA environment variable is set"
        } else if cfg!(target_os = "macos") {
            "check that the HOME environment variable is set"
        } else {
            "check that the XDG_DATA_HOME or HOME environment variable is set"
        };
        LauncherError::config(format!(
            "could not determine data directory; {platform_help}, or set product.install_dir"
        ))
    })
}

/// The user's desktop directory, falling back to `~/Desktop`.
pub fn get_desktop_dir() -> Result<PathBuf> {
    match dirs::desktop_dir() {
        Some(dir) => Ok(dir),
        None => Ok(get_home_dir()?.join("Desktop")),
    }
}

/// Expand `~` and environment variables in a configured path and make it
/// absolute against the current directory.
///
/// Undefined variables are an error rather than being left in place, so a typo
/// in the config never creates a literal `$HOEM` directory.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).map_err(|e| {
        LauncherError::config(format!("failed to expand path '{path}': {e}"))
    })?;
    std::path::absolute(expanded.as_ref()).map_err(|e| {
        LauncherError::config(format!("failed to resolve path '{path}': {e}"))
    })
}
