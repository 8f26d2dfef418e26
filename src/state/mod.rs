//! The install directory and its persisted version record.
//!
//! [`LocalStateStore`] is the only component that reads or writes
//! `<install_dir>/.version`. The file holds a single line in the version record
//! format (`1.4.2:beta`). On first run it is created with the sentinel
//! `0.0.0:alpha`, which any published release is newer than.
//!
//! Writes go through [`atomic_write`], so a crash during
//! [`persist`](LocalStateStore::persist) leaves either the previous record or the
//! new one.

use crate::config::LauncherConfig;
use crate::constants::VERSION_FILE;
use crate::core::{LauncherError, Result};
use crate::utils::fs::atomic_write;
use crate::version::VersionRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What is installed and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallState {
    pub install_dir: PathBuf,
    pub current_version: VersionRecord,
}

/// Owner of the install directory and the local version record.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    install_dir: PathBuf,
}

impl LocalStateStore {
    /// A store rooted at an explicit install directory.
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    /// A store rooted at the configured install directory
    /// (`<data_dir>/<product>` unless overridden).
    pub fn from_config(config: &LauncherConfig) -> Result<Self> {
        config.validate_product()?;
        Ok(Self::new(config.install_dir()?))
    }

    /// The install directory, whether or not it exists yet.
    #[must_use]
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Path of the persisted version record.
    #[must_use]
    pub fn version_file(&self) -> PathBuf {
        self.install_dir.join(VERSION_FILE)
    }

    /// Create the install directory if absent. Idempotent.
    pub async fn ensure_install_dir(&self) -> Result<&Path> {
        tokio::fs::create_dir_all(&self.install_dir).await.map_err(|source| {
            LauncherError::storage("create install directory", &self.install_dir, source)
        })?;
        Ok(&self.install_dir)
    }

    /// Read the persisted record, creating it with the sentinel if absent.
    ///
    /// # Errors
    ///
    /// - [`LauncherError::Storage`] when the directory or file cannot be
    ///   created, read or written
    /// - [`LauncherError::MalformedVersion`] when the file exists but does not
    ///   parse
    pub async fn read_or_initialize(&self) -> Result<VersionRecord> {
        self.ensure_install_dir().await?;

        if let Some(version) = self.read().await? {
            return Ok(version);
        }

        let sentinel = VersionRecord::sentinel();
        info!(
            path = %self.version_file().display(),
            version = %sentinel,
            "No local version record, initializing"
        );
        self.persist(&sentinel).await?;
        Ok(sentinel)
    }

    /// Read the persisted record without creating anything.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub async fn read(&self) -> Result<Option<VersionRecord>> {
        let path = self.version_file();
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let version = VersionRecord::parse(&content)?;
                debug!(path = %path.display(), version = %version, "Read local version record");
                Ok(Some(version))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LauncherError::storage("read version record", path, source)),
        }
    }

    /// Atomically replace the persisted record.
    pub async fn persist(&self, version: &VersionRecord) -> Result<()> {
        let path = self.version_file();
        let content = version.to_string();

        let target = path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&target, content.as_bytes()))
            .await
            .map_err(|e| {
                LauncherError::storage("write version record", &path, std::io::Error::other(e))
            })??;

        info!(path = %path.display(), version = %version, "Persisted local version record");
        Ok(())
    }

    /// The current install state, initializing the record if needed.
    pub async fn install_state(&self) -> Result<InstallState> {
        let current_version = self.read_or_initialize().await?;
        Ok(InstallState {
            install_dir: self.install_dir.clone(),
            current_version,
        })
    }
}
