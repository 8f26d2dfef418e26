//! The object handed to a front end.
//!
//! A [`LauncherSession`] owns one instance of each component for a single
//! install directory. Front ends call its methods directly, or use the
//! `spawn_*` variants to get the result through a [`JoinHandle`] without
//! blocking their own loop.

use crate::config::LauncherConfig;
use crate::core::Result;
use crate::launcher::{LaunchedApp, Launcher};
use crate::source::{HttpSource, RemoteSource};
use crate::state::LocalStateStore;
use crate::upgrade::{InstallResult, UpdateOrchestrator, UpdateOutcome, UpdateState};
use crate::version::VersionRecord;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Snapshot of the install directory, without touching the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub install_dir: PathBuf,
    /// `None` before the first check or install.
    pub installed_version: Option<VersionRecord>,
    pub executable: PathBuf,
    pub executable_present: bool,
    pub state: UpdateState,
}

pub struct LauncherSession {
    store: LocalStateStore,
    source: Arc<dyn RemoteSource>,
    orchestrator: Arc<UpdateOrchestrator>,
    launcher: Launcher,
}

impl std::fmt::Debug for LauncherSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LauncherSession")
            .field("install_dir", &self.store.install_dir())
            .field("source", &self.source.describe())
            .field("launcher", &self.launcher)
            .finish_non_exhaustive()
    }
}

impl LauncherSession {
    /// Build every component from the config, using the HTTP source it
    /// describes.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Configuration`](crate::core::LauncherError::Configuration)
    /// when the product or source settings are incomplete.
    pub fn from_config(config: &LauncherConfig, show_progress: bool) -> Result<Self> {
        let source = Arc::new(HttpSource::from_config(config)?);
        Self::with_source(config, source, show_progress)
    }

    /// Like [`from_config`](Self::from_config) with a caller-supplied source.
    pub fn with_source(
        config: &LauncherConfig,
        source: Arc<dyn RemoteSource>,
        show_progress: bool,
    ) -> Result<Self> {
        let store = LocalStateStore::from_config(config)?;
        let orchestrator = UpdateOrchestrator::from_config(
            config,
            store.clone(),
            Arc::clone(&source),
            show_progress,
        )?;
        let launcher = Launcher::new(store.install_dir(), config.executable_name());
        debug!(
            install_dir = %store.install_dir().display(),
            source = %source.describe(),
            "Launcher session ready"
        );

        Ok(Self {
            store,
            source,
            orchestrator: Arc::new(orchestrator),
            launcher,
        })
    }

    #[must_use]
    pub fn source(&self) -> &dyn RemoteSource {
        self.source.as_ref()
    }

    #[must_use]
    pub const fn store(&self) -> &LocalStateStore {
        &self.store
    }

    #[must_use]
    pub fn state(&self) -> UpdateState {
        self.orchestrator.state()
    }

    pub async fn check_version(&self) -> Result<UpdateOutcome> {
        self.orchestrator.check_version().await
    }

    pub async fn start_update(&self) -> Result<InstallResult> {
        self.orchestrator.start_update().await
    }

    pub async fn run_app(&self) -> Result<LaunchedApp> {
        self.launcher.run_app().await.inspect_err(|e| {
            error!(error = %e, "Error starting application");
        })
    }

    /// Read-only view of the install.
    pub async fn status(&self) -> Result<SessionStatus> {
        let executable = self.launcher.executable_path();
        let executable_present = tokio::fs::metadata(&executable)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);

        Ok(SessionStatus {
            install_dir: self.store.install_dir().to_path_buf(),
            installed_version: self.store.read().await?,
            executable,
            executable_present,
            state: self.state(),
        })
    }

    pub fn spawn_check_version(&self) -> JoinHandle<Result<UpdateOutcome>> {
        let orchestrator = Arc::clone(&self.orchestrator);
        tokio::spawn(async move { orchestrator.check_version().await })
    }

    pub fn spawn_start_update(&self) -> JoinHandle<Result<InstallResult>> {
        let orchestrator = Arc::clone(&self.orchestrator);
        tokio::spawn(async move { orchestrator.start_update().await })
    }

    pub fn spawn_run_app(&self) -> JoinHandle<Result<LaunchedApp>> {
        let launcher = self.launcher.clone();
        tokio::spawn(async move { launcher.run_app().await })
    }
}
