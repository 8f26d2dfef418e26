//! Package installation: download, extract, lock.
//!
//! The install sequence for one release:
//!
//! 1. Open the package stream from the [`RemoteSource`]
//! 2. Write it into a scoped temporary file ([`download_to_temp`])
//! 3. Extract the archive over the install directory on the blocking pool
//!    ([`extract_in_background`])
//! 4. Drop the temporary file
//!
//! The temporary file never outlives [`PackageInstaller::install`], whether it
//! returns `Ok` or `Err`. Concurrency control ([`UpdateLock`]) and version
//! bookkeeping belong to the caller.

pub mod download;
pub mod extract;
pub mod lock;

pub use download::{DownloadedPackage, download_to_temp};
pub use extract::{ExtractSummary, extract_archive, extract_in_background};
pub use lock::UpdateLock;

use crate::core::Result;
use crate::source::{RemotePackageRef, RemoteSource};
use crate::utils::ProgressBar;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a successful install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallReport {
    /// Bytes downloaded.
    pub bytes: u64,
    pub extracted: ExtractSummary,
}

/// Installs packages into one directory.
#[derive(Debug, Clone)]
pub struct PackageInstaller {
    install_dir: PathBuf,
    show_progress: bool,
}

impl PackageInstaller {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while downloading.
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    #[must_use]
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Download `remote` from `source` and extract it into the install directory.
    ///
    /// # Errors
    ///
    /// `Network`/`Timeout` from the download, `Install` from writing or
    /// extracting.
    pub async fn install(
        &self,
        source: &dyn RemoteSource,
        remote: &RemotePackageRef,
    ) -> Result<InstallReport> {
        let stream = source.fetch_package_stream(&remote.locator).await?;

        let progress = ProgressBar::download(stream.content_length, self.show_progress);
        progress.set_prefix("Downloading");
        let downloaded = download_to_temp(stream, &progress).await;
        progress.finish_and_clear();
        let package = downloaded?;

        info!(
            version = %remote.version,
            bytes = package.len(),
            "Package downloaded, extracting"
        );

        let spinner = ProgressBar::spinner("Extracting package", self.show_progress);
        let extracted =
            extract_in_background(package.path().to_path_buf(), self.install_dir.clone()).await;
        spinner.finish_and_clear();
        let extracted = extracted?;

        let report = InstallReport {
            bytes: package.len(),
            extracted,
        };
        drop(package);

        info!(
            version = %remote.version,
            files = report.extracted.files,
            skipped = report.extracted.skipped,
            dir = %self.install_dir.display(),
            "Package installed"
        );
        Ok(report)
    }
}
