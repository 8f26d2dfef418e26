//! Starting the installed application.
//!
//! [`Launcher`] spawns the executable from the install directory as a detached
//! child: stdio is redirected to null, the working directory is the install
//! directory, and the child gets its own process group on Unix
//! (`DETACHED_PROCESS` on Windows) so it outlives the launcher.
//!
//! Only spawn failures are reported to the caller. The exit status is
//! collected by a background task and logged.

use crate::config::LauncherConfig;
use crate::core::{LauncherError, Result};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;

/// Spawns the installed executable.
#[derive(Debug, Clone)]
pub struct Launcher {
    install_dir: PathBuf,
    executable: String,
    args: Vec<String>,
}

/// A started application.
#[derive(Debug)]
pub struct LaunchedApp {
    pub executable: PathBuf,
    pub pid: Option<u32>,
    exit: JoinHandle<Option<ExitStatus>>,
}

impl LaunchedApp {
    /// Wait for the application to exit.
    ///
    /// Returns `None` when the exit status could not be collected.
    pub async fn wait(self) -> Option<ExitStatus> {
        self.exit.await.ok().flatten()
    }
}

impl Launcher {
    pub fn new(install_dir: impl Into<PathBuf>, executable: impl Into<String>) -> Self {
        Self {
            install_dir: install_dir.into(),
            executable: executable.into(),
            args: Vec::new(),
        }
    }

    pub fn from_config(config: &LauncherConfig) -> Result<Self> {
        config.validate_product()?;
        Ok(Self::new(config.install_dir()?, config.executable_name()))
    }

    /// Extra arguments passed to the application.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Full path of the executable.
    #[must_use]
    pub fn executable_path(&self) -> PathBuf {
        self.install_dir.join(&self.executable)
    }

    #[must_use]
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Start the application without waiting for it.
    ///
    /// Must be called inside a tokio runtime; the exit status is collected by
    /// a spawned task.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Launch`] when the executable is missing or the OS
    /// refuses to start it.
    pub async fn run_app(&self) -> Result<LaunchedApp> {
        let executable = self.executable_path();
        match tokio::fs::metadata(&executable).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(LauncherError::launch(&executable, "not a regular file")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LauncherError::launch(
                    &executable,
                    "executable not found; run an update first",
                ));
            }
            Err(e) => return Err(LauncherError::launch(&executable, e)),
        }

        let mut cmd = Command::new(&executable);
        cmd.args(&self.args)
            .current_dir(&self.install_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        cmd.process_group(0);
        #[cfg(windows)]
        cmd.creation_flags(DETACHED_PROCESS);

        debug!(executable = %executable.display(), args = ?self.args, "Spawning application");
        let mut child = cmd.spawn().map_err(|e| LauncherError::launch(&executable, e))?;
        let pid = child.id();
        info!(executable = %executable.display(), pid = ?pid, "Application started");

        let exit = tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {
                    info!(pid = ?pid, "Application exited");
                    Some(status)
                }
                Ok(status) => {
                    warn!(pid = ?pid, status = %status, "Application exited with failure");
                    Some(status)
                }
                Err(e) => {
                    warn!(pid = ?pid, error = %e, "Could not wait for application");
                    None
                }
            }
        });

        Ok(LaunchedApp {
            executable,
            pid,
            exit,
        })
    }
}
