use super::state::{StateGuard, lock};
use super::UpdateState;
use crate::config::LauncherConfig;
use crate::core::{LauncherError, Result};
use crate::installer::{InstallReport, PackageInstaller, UpdateLock};
use crate::platform::Platform;
use crate::source::RemoteSource;
use crate::state::LocalStateStore;
use crate::version::{VersionRecord, is_newer};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

/// Result of a version check, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub update_available: bool,
    /// The remote version.
    pub version: VersionRecord,
    /// The locally recorded version at the time of the check.
    pub local: VersionRecord,
}

impl Serialize for UpdateOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("UpdateOutcome", 4)?;
        s.serialize_field("version", &self.version.numeric_string())?;
        s.serialize_field("release", self.version.release_tag())?;
        s.serialize_field("update_available", &self.update_available)?;
        s.serialize_field("local", &self.local)?;
        s.end()
    }
}

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallResult {
    pub version: VersionRecord,
    pub previous: VersionRecord,
    pub bytes: u64,
    pub files: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<PathBuf>,
}

/// Where the launch shortcut goes after each install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutSpec {
    pub platform: Platform,
    /// Display name of the shortcut.
    pub name: String,
    pub output_dir: PathBuf,
}

/// Runs version checks and installs against one install directory.
pub struct UpdateOrchestrator {
    store: LocalStateStore,
    source: Arc<dyn RemoteSource>,
    installer: PackageInstaller,
    executable: String,
    shortcut: Option<ShortcutSpec>,
    persist_on_check: bool,
    state: Mutex<UpdateState>,
}

impl std::fmt::Debug for UpdateOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateOrchestrator")
            .field("install_dir", &self.store.install_dir())
            .field("source", &self.source.describe())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl UpdateOrchestrator {
    /// An orchestrator with no shortcut and check-only version checks.
    pub fn new(
        store: LocalStateStore,
        source: Arc<dyn RemoteSource>,
        executable: impl Into<String>,
    ) -> Self {
        let installer = PackageInstaller::new(store.install_dir());
        Self {
            store,
            source,
            installer,
            executable: executable.into(),
            shortcut: None,
            persist_on_check: false,
            state: Mutex::new(UpdateState::Idle),
        }
    }

    /// Build from the launcher config.
    pub fn from_config(
        config: &LauncherConfig,
        store: LocalStateStore,
        source: Arc<dyn RemoteSource>,
        show_progress: bool,
    ) -> Result<Self> {
        let shortcut = if config.update.create_shortcut {
            Some(ShortcutSpec {
                platform: Platform::current(),
                name: config.shortcut_name().to_string(),
                output_dir: config.shortcut_dir()?,
            })
        } else {
            None
        };

        Ok(Self::new(store, source, config.executable_name())
            .with_shortcut(shortcut)
            .with_persist_on_check(config.update.persist_on_check)
            .with_progress(show_progress))
    }

    #[must_use]
    pub fn with_shortcut(mut self, shortcut: Option<ShortcutSpec>) -> Self {
        self.shortcut = shortcut;
        self
    }

    /// Persist the remote record during `check_version` when it is newer.
    #[must_use]
    pub const fn with_persist_on_check(mut self, persist_on_check: bool) -> Self {
        self.persist_on_check = persist_on_check;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.installer = self.installer.with_progress(show_progress);
        self
    }

    /// Current state, for display.
    #[must_use]
    pub fn state(&self) -> UpdateState {
        *lock(&self.state)
    }

    #[must_use]
    pub const fn store(&self) -> &LocalStateStore {
        &self.store
    }

    #[must_use]
    pub fn source(&self) -> &dyn RemoteSource {
        self.source.as_ref()
    }

    /// Compare the local record with the remote one.
    ///
    /// Read-only unless `persist_on_check` is enabled.
    ///
    /// # Errors
    ///
    /// [`LauncherError::OperationInProgress`] while an install is running;
    /// otherwise any storage, network or parse error from the two reads. On
    /// error the state goes back to what it was before the call.
    pub async fn check_version(&self) -> Result<UpdateOutcome> {
        let guard = {
            let mut state = lock(&self.state);
            if *state == UpdateState::Installing {
                warn!("Version check rejected: an update is in progress");
                return Err(LauncherError::OperationInProgress);
            }
            StateGuard::enter(&self.state, &mut state, UpdateState::CheckingVersion)
        };

        let outcome = self.compare_versions().await.inspect_err(|e| {
            error!(error = %e, "Version check failed");
        })?;

        if outcome.update_available && self.persist_on_check {
            self.store.persist(&outcome.version).await.inspect_err(|e| {
                error!(error = %e, "Failed to record remote version during check");
            })?;
        }

        if outcome.update_available {
            info!(local = %outcome.local, remote = %outcome.version, "A new version is available");
            guard.finish(UpdateState::UpdateAvailable);
        } else {
            info!(local = %outcome.local, remote = %outcome.version, "Application is up to date");
            guard.finish(UpdateState::UpToDate);
        }
        Ok(outcome)
    }

    async fn compare_versions(&self) -> Result<UpdateOutcome> {
        let local = self.store.read_or_initialize().await?;
        let remote = self.source.fetch_version_record().await?;
        Ok(UpdateOutcome {
            update_available: is_newer(&local, &remote),
            version: remote,
            local,
        })
    }

    /// Download and install the current remote release.
    ///
    /// The remote record is fetched again rather than taken from an earlier
    /// check. The local record is persisted only after everything else
    /// succeeded.
    ///
    /// # Errors
    ///
    /// [`LauncherError::OperationInProgress`] when another install is running in
    /// this process or holds the install directory lock; otherwise the error
    /// of the failing step, with the state left at `Failed`.
    pub async fn start_update(&self) -> Result<InstallResult> {
        let mut guard = {
            let mut state = lock(&self.state);
            if *state == UpdateState::Installing {
                warn!("Update rejected: another update is in progress");
                return Err(LauncherError::OperationInProgress);
            }
            StateGuard::enter(&self.state, &mut state, UpdateState::Installing)
        };

        let installed = self.install(&mut guard).await.inspect_err(|e| {
            error!(error = %e, "Update failed");
        })?;
        guard.finish(UpdateState::Installed);
        Ok(installed)
    }

    async fn install(&self, guard: &mut StateGuard<'_>) -> Result<InstallResult> {
        let install_dir = self.store.ensure_install_dir().await?.to_path_buf();

        // Losing the lock race is not a failed update; keep the prior state.
        let _lock = UpdateLock::try_acquire(&install_dir).await?;
        guard.set_fallback(UpdateState::Failed);

        let previous = self.store.read_or_initialize().await?;
        let remote = self.source.fetch_package().await?;
        info!(from = %previous, to = %remote.version, "Installing update");

        let InstallReport {
            bytes,
            extracted,
        } = self.installer.install(self.source.as_ref(), &remote).await?;

        let shortcut = match &self.shortcut {
            Some(spec) => {
                let executable = install_dir.join(&self.executable);
                let spec = spec.clone();
                let path = tokio::task::spawn_blocking(move || {
                    spec.platform.create_launch_shortcut(&executable, &spec.name, &spec.output_dir)
                })
                .await
                .map_err(|e| LauncherError::install("shortcut", e))??;
                Some(path)
            }
            None => None,
        };

        self.store.persist(&remote.version).await?;
        info!(version = %remote.version, "Update completed successfully");

        Ok(InstallResult {
            version: remote.version,
            previous,
            bytes,
            files: extracted.files,
            shortcut,
        })
    }
}
