//! Launch shortcuts, one format per operating system.
//!
//! | Platform | Shortcut | Notes |
//! |----------|----------|-------|
//! | Windows | `<name>.url` | internet shortcut pointing at a `file:///` URL |
//! | Linux | `<name>.desktop` | desktop entry, marked executable |
//! | macOS | `<name>` | symlink to the executable |
//!
//! Shortcuts are rewritten on every install, so a moved install directory is
//! picked up by the next update.

use crate::core::{LauncherError, Result};
use crate::utils::fs::{atomic_write, ensure_dir};
use reqwest::Url;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const STAGE: &str = "shortcut";

/// Target operating system family for shortcut creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// The platform this binary was built for.
    ///
    /// Unix flavours other than macOS use the Linux desktop entry format.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    /// File name of the shortcut for a display `name`.
    #[must_use]
    pub fn shortcut_file_name(self, name: &str) -> String {
        match self {
            Self::Windows => format!("{name}.url"),
            Self::Linux => format!("{name}.desktop"),
            Self::MacOs => name.to_string(),
        }
    }

    /// Create (or replace) a shortcut named `name` in `output_dir` that starts
    /// `executable`.
    ///
    /// Returns the path of the shortcut.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Install`] with stage `shortcut` when the shortcut
    /// cannot be written.
    pub fn create_launch_shortcut(
        self,
        executable: &Path,
        name: &str,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        if !executable.exists() {
            warn!(
                executable = %executable.display(),
                "Creating shortcut for an executable that does not exist yet"
            );
        }

        ensure_dir(output_dir).map_err(|e| LauncherError::install(STAGE, e))?;
        let shortcut = output_dir.join(self.shortcut_file_name(name));

        match self {
            Self::Windows => {
                let content = windows_url_shortcut(executable)?;
                atomic_write(&shortcut, content.as_bytes())
                    .map_err(|e| LauncherError::install(STAGE, e))?;
            }
            Self::Linux => {
                let content = desktop_entry(executable, name);
                atomic_write(&shortcut, content.as_bytes())
                    .map_err(|e| LauncherError::install(STAGE, e))?;
                mark_executable(&shortcut)?;
            }
            Self::MacOs => symlink_shortcut(executable, &shortcut)?,
        }

        debug!(shortcut = %shortcut.display(), platform = ?self, "Launch shortcut written");
        Ok(shortcut)
    }
}

fn windows_url_shortcut(executable: &Path) -> Result<String> {
    let url = Url::from_file_path(executable).map_err(|()| {
        LauncherError::install(
            STAGE,
            format!("executable path is not absolute: {}", executable.display()),
        )
    })?;
    let icon = executable.display();
    Ok(format!("[InternetShortcut]\r\nURL={url}\r\nIconFile={icon}\r\nIconIndex=0\r\n"))
}

fn desktop_entry(executable: &Path, name: &str) -> String {
    let working_dir = executable.parent().map(Path::display);
    let mut entry = format!(
        "[Desktop Entry]\nType=Application\nName={name}\nExec={}\nTerminal=false\n",
        quote_exec_arg(&executable.to_string_lossy())
    );
    if let Some(dir) = working_dir {
        entry.push_str(&format!("Path={dir}\n"));
    }
    entry
}

/// Quote an `Exec=` argument using freedesktop quoting rules.
fn quote_exec_arg(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| LauncherError::install(STAGE, format!("cannot chmod {}: {e}", path.display())))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn symlink_shortcut(executable: &Path, shortcut: &Path) -> Result<()> {
    match std::fs::symlink_metadata(shortcut) {
        Ok(_) => std::fs::remove_file(shortcut).map_err(|e| {
            LauncherError::install(STAGE, format!("cannot replace {}: {e}", shortcut.display()))
        })?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(LauncherError::install(
                STAGE,
                format!("cannot inspect {}: {e}", shortcut.display()),
            ));
        }
    }
    std::os::unix::fs::symlink(executable, shortcut).map_err(|e| {
        LauncherError::install(STAGE, format!("cannot link {}: {e}", shortcut.display()))
    })
}

#[cfg(not(unix))]
fn symlink_shortcut(_executable: &Path, shortcut: &Path) -> Result<()> {
    Err(LauncherError::install(
        STAGE,
        format!("symlink shortcuts are not supported here: {}", shortcut.display()),
    ))
}
