use super::*;
use crate::config::{LauncherConfig, SourceKind};
use crate::core::{ErrorKind, Result};
use crate::installer::UpdateLock;
use crate::platform::Platform;
use crate::source::{HttpSource, PackageLocator, PackageStream, RemotePackageRef, RemoteSource};
use crate::state::LocalStateStore;
use crate::test_utils::{ZipFixture, init_test_logging};
use crate::version::VersionRecord;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use mockito::{Server, ServerGuard};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;

struct Fixture {
    _temp: TempDir,
    install_dir: PathBuf,
    desktop: PathBuf,
    server: ServerGuard,
}

impl Fixture {
    async fn new() -> Self {
        init_test_logging(None);
        let temp = TempDir::new().unwrap();
        Self {
            install_dir: temp.path().join("kcdmod"),
            desktop: temp.path().join("Desktop"),
            _temp: temp,
            server: Server::new_async().await,
        }
    }

    fn orchestrator(&self) -> UpdateOrchestrator {
        let mut config = LauncherConfig::default();
        config.source.kind = SourceKind::Direct;
        config.source.version_url = Some(format!("{}/version.txt", self.server.url()));
        config.source.package_url = Some(format!("{}/kcdmod.zip", self.server.url()));
        let source = HttpSource::from_config(&config).unwrap();

        UpdateOrchestrator::new(
            LocalStateStore::new(&self.install_dir),
            Arc::new(source),
            "KCDMOD.exe",
        )
        .with_shortcut(Some(ShortcutSpec {
            platform: Platform::Linux,
            name: "kcdmod".to_string(),
            output_dir: self.desktop.clone(),
        }))
    }

    fn write_local(&self, record: &str) {
        std::fs::create_dir_all(&self.install_dir).unwrap();
        std::fs::write(self.install_dir.join(".version"), record).unwrap();
    }

    fn local(&self) -> String {
        std::fs::read_to_string(self.install_dir.join(".version")).unwrap()
    }

    async fn serve_version(&mut self, record: &str) -> mockito::Mock {
        self.server
            .mock("GET", "/version.txt")
            .with_status(200)
            .with_body(record)
            .create_async()
            .await
    }

    async fn serve_package(&mut self, body: Vec<u8>) -> mockito::Mock {
        self.server
            .mock("GET", "/kcdmod.zip")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await
    }

    async fn fail_package(&mut self, status: usize) -> mockito::Mock {
        self.server.mock("GET", "/kcdmod.zip").with_status(status).create_async().await
    }
}

fn release_archive() -> Vec<u8> {
    ZipFixture::new()
        .file("KCDMOD.exe", b"new build")
        .file("data/mods.txt", b"mod list")
        .to_bytes()
}

/// A source whose package download blocks until released.
struct GatedSource {
    version: VersionRecord,
    archive: Vec<u8>,
    entered: Arc<Notify>,
    release: Arc<Notify>,
    /// Also block the first version fetch on `version_release`.
    hold_version: AtomicBool,
    version_entered: Arc<Notify>,
    version_release: Arc<Notify>,
}

impl GatedSource {
    fn new(version: &str) -> Self {
        Self {
            version: version.parse().unwrap(),
            archive: release_archive(),
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            hold_version: AtomicBool::new(false),
            version_entered: Arc::new(Notify::new()),
            version_release: Arc::new(Notify::new()),
        }
    }

    fn holding_version(self) -> Self {
        self.hold_version.store(true, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl RemoteSource for GatedSource {
    async fn fetch_version_record(&self) -> Result<VersionRecord> {
        if self.hold_version.swap(false, Ordering::SeqCst) {
            self.version_entered.notify_one();
            self.version_release.notified().await;
        }
        Ok(self.version.clone())
    }

    async fn fetch_package(&self) -> Result<RemotePackageRef> {
        Ok(RemotePackageRef {
            version: self.version.clone(),
            locator: PackageLocator::new("memory://kcdmod.zip"),
        })
    }

    async fn fetch_package_stream(&self, _locator: &PackageLocator) -> Result<PackageStream> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(PackageStream {
            content_length: Some(self.archive.len() as u64),
            bytes: futures::stream::iter(vec![Ok(Bytes::from(self.archive.clone()))]).boxed(),
        })
    }

    fn describe(&self) -> String {
        "gated test source".to_string()
    }
}

fn gated_orchestrator(install_dir: &Path, source: &Arc<GatedSource>) -> Arc<UpdateOrchestrator> {
    let source: Arc<dyn RemoteSource> = source.clone();
    Arc::new(UpdateOrchestrator::new(LocalStateStore::new(install_dir), source, "KCDMOD.exe"))
}

/// Names and contents of every file under `dir`, sorted.
fn snapshot(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let content = std::fs::read(&path).unwrap();
                files.push((path, content));
            }
        }
    }
    files.sort();
    files
}

#[tokio::test]
async fn test_check_on_fresh_install_reports_update() {
    let mut fx = Fixture::new().await;
    let _version = fx.serve_version("1.0.0:r1").await;
    let orchestrator = fx.orchestrator();

    let outcome = orchestrator.check_version().await.unwrap();

    assert!(outcome.update_available);
    assert_eq!(outcome.version.to_string(), "1.0.0:r1");
    assert_eq!(outcome.local, VersionRecord::sentinel());
    assert_eq!(orchestrator.state(), UpdateState::UpdateAvailable);
    // Checking never records the remote version.
    assert_eq!(fx.local(), "0.0.0:alpha");
}

#[tokio::test]
async fn test_check_up_to_date() {
    let mut fx = Fixture::new().await;
    fx.write_local("1.0.0:r1\n");
    let _version = fx.serve_version("1.0.0:r1").await;
    let orchestrator = fx.orchestrator();

    let outcome = orchestrator.check_version().await.unwrap();

    assert!(!outcome.update_available);
    assert_eq!(orchestrator.state(), UpdateState::UpToDate);
}

#[tokio::test]
async fn test_check_tag_change_is_update() {
    let mut fx = Fixture::new().await;
    fx.write_local("1.2.3:alpha");
    let _version = fx.serve_version("1.2.3:beta").await;

    let outcome = fx.orchestrator().check_version().await.unwrap();
    assert!(outcome.update_available);
}

#[tokio::test]
async fn test_failed_check_restores_previous_state() {
    let mut fx = Fixture::new().await;
    let ok = fx.serve_version("2.0.0:r1").await;
    let orchestrator = fx.orchestrator();

    orchestrator.check_version().await.unwrap();
    assert_eq!(orchestrator.state(), UpdateState::UpdateAvailable);

    ok.remove_async().await;
    let _broken = fx.server.mock("GET", "/version.txt").with_status(503).create_async().await;

    let err = orchestrator.check_version().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(orchestrator.state(), UpdateState::UpdateAvailable);
}

#[tokio::test]
async fn test_failed_first_check_returns_to_idle() {
    let mut fx = Fixture::new().await;
    let _version = fx.serve_version("not-a-version").await;
    let orchestrator = fx.orchestrator();

    let err = orchestrator.check_version().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedVersion);
    assert_eq!(orchestrator.state(), UpdateState::Idle);
}

#[tokio::test]
async fn test_persist_on_check_records_remote_version() {
    let mut fx = Fixture::new().await;
    let _version = fx.serve_version("1.1.0:r1").await;
    let orchestrator = fx.orchestrator().with_persist_on_check(true);

    let outcome = orchestrator.check_version().await.unwrap();

    assert!(outcome.update_available);
    assert_eq!(fx.local(), "1.1.0:r1");
}

#[tokio::test]
async fn test_start_update_installs_and_persists() {
    let mut fx = Fixture::new().await;
    fx.write_local("0.9.0:r1");
    let _version = fx.serve_version("1.0.0:r2").await;
    let archive = release_archive();
    let package = fx.serve_package(archive.clone()).await;
    let orchestrator = fx.orchestrator();

    let installed = orchestrator.start_update().await.unwrap();

    package.assert_async().await;
    assert_eq!(installed.version.to_string(), "1.0.0:r2");
    assert_eq!(installed.previous.to_string(), "0.9.0:r1");
    assert_eq!(installed.bytes, archive.len() as u64);
    assert_eq!(installed.files, 2);
    assert_eq!(orchestrator.state(), UpdateState::Installed);

    assert_eq!(fx.local(), "1.0.0:r2");
    assert_eq!(std::fs::read(fx.install_dir.join("KCDMOD.exe")).unwrap(), b"new build");
    let shortcut = installed.shortcut.unwrap();
    assert_eq!(shortcut, fx.desktop.join("kcdmod.desktop"));
    assert!(std::fs::read_to_string(shortcut).unwrap().contains("KCDMOD.exe"));
}

#[tokio::test]
async fn test_start_update_without_shortcut() {
    let mut fx = Fixture::new().await;
    let _version = fx.serve_version("1.0.0:r1").await;
    let _package = fx.serve_package(release_archive()).await;
    let orchestrator = fx.orchestrator().with_shortcut(None);

    let installed = orchestrator.start_update().await.unwrap();
    assert!(installed.shortcut.is_none());
    assert!(!fx.desktop.exists());
}

#[tokio::test]
async fn test_package_failure_leaves_version_unchanged() {
    let mut fx = Fixture::new().await;
    fx.write_local("0.9.0:r1");
    let _version = fx.serve_version("1.0.0:r1").await;
    let _package = fx.fail_package(500).await;
    let orchestrator = fx.orchestrator();

    let err = orchestrator.start_update().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(orchestrator.state(), UpdateState::Failed);
    assert_eq!(fx.local(), "0.9.0:r1");
    assert!(!fx.install_dir.join("KCDMOD.exe").exists());
}

#[tokio::test]
async fn test_retry_after_failure_starts_from_scratch() {
    let mut fx = Fixture::new().await;
    let _version = fx.serve_version("1.0.0:r1").await;
    let broken = fx.fail_package(502).await;
    let orchestrator = fx.orchestrator();

    orchestrator.start_update().await.unwrap_err();
    assert_eq!(orchestrator.state(), UpdateState::Failed);

    broken.remove_async().await;
    let _package = fx.serve_package(release_archive()).await;

    orchestrator.start_update().await.unwrap();
    assert_eq!(orchestrator.state(), UpdateState::Installed);
    assert_eq!(fx.local(), "1.0.0:r1");
}

#[tokio::test]
async fn test_corrupt_archive_is_install_error() {
    let mut fx = Fixture::new().await;
    fx.write_local("0.9.0:r1");
    let _version = fx.serve_version("1.0.0:r1").await;
    let _package = fx.serve_package(b"not a zip".to_vec()).await;
    let orchestrator = fx.orchestrator();

    let err = orchestrator.start_update().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Install);
    assert_eq!(orchestrator.state(), UpdateState::Failed);
    assert_eq!(fx.local(), "0.9.0:r1");
}

#[tokio::test]
async fn test_shortcut_failure_leaves_version_unchanged() {
    let mut fx = Fixture::new().await;
    fx.write_local("0.9.0:r1");
    let _version = fx.serve_version("1.0.0:r1").await;
    let _package = fx.serve_package(release_archive()).await;
    // A file where the shortcut directory should be.
    std::fs::write(&fx.desktop, "in the way").unwrap();
    let orchestrator = fx.orchestrator();

    let err = orchestrator.start_update().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Install);
    assert!(err.to_string().contains("shortcut"));
    assert_eq!(fx.local(), "0.9.0:r1");
}

#[tokio::test]
async fn test_concurrent_start_update_is_rejected() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let install_dir = temp.path().join("kcdmod");
    let source = Arc::new(GatedSource::new("1.0.0:r1"));
    let orchestrator = gated_orchestrator(&install_dir, &source);

    let first = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.start_update().await })
    };
    source.entered.notified().await;
    assert_eq!(orchestrator.state(), UpdateState::Installing);

    let before = snapshot(&install_dir);
    let err = orchestrator.start_update().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationInProgress);
    assert_eq!(snapshot(&install_dir), before);

    let err = orchestrator.check_version().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationInProgress);
    assert_eq!(orchestrator.state(), UpdateState::Installing);

    source.release.notify_one();
    let installed = first.await.unwrap().unwrap();
    assert_eq!(installed.version.to_string(), "1.0.0:r1");
    assert_eq!(orchestrator.state(), UpdateState::Installed);
}

#[tokio::test]
async fn test_check_finishing_during_install_keeps_installing() {
    let temp = TempDir::new().unwrap();
    let install_dir = temp.path().join("kcdmod");
    let source = Arc::new(GatedSource::new("1.0.0:r1").holding_version());
    let orchestrator = gated_orchestrator(&install_dir, &source);

    let check = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.check_version().await })
    };
    source.version_entered.notified().await;
    assert_eq!(orchestrator.state(), UpdateState::CheckingVersion);

    let update = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.start_update().await })
    };
    source.entered.notified().await;
    assert_eq!(orchestrator.state(), UpdateState::Installing);

    source.version_release.notify_one();
    let outcome = check.await.unwrap().unwrap();
    assert!(outcome.update_available);
    assert_eq!(orchestrator.state(), UpdateState::Installing);

    let err = orchestrator.check_version().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationInProgress);

    source.release.notify_one();
    update.await.unwrap().unwrap();
    assert_eq!(orchestrator.state(), UpdateState::Installed);
}

#[tokio::test]
async fn test_cancelled_update_is_failed() {
    let temp = TempDir::new().unwrap();
    let install_dir = temp.path().join("kcdmod");
    let source = Arc::new(GatedSource::new("1.0.0:r1"));
    let orchestrator = gated_orchestrator(&install_dir, &source);

    let timed_out =
        tokio::time::timeout(Duration::from_millis(100), orchestrator.start_update()).await;

    assert!(timed_out.is_err());
    assert_eq!(orchestrator.state(), UpdateState::Failed);
    assert_eq!(std::fs::read_to_string(install_dir.join(".version")).unwrap(), "0.0.0:alpha");

    // The lock was released with the dropped future.
    let _lock = UpdateLock::try_acquire(&install_dir).await.unwrap();
}

#[tokio::test]
async fn test_lock_held_elsewhere_is_rejected() {
    let temp = TempDir::new().unwrap();
    let install_dir = temp.path().join("kcdmod");
    std::fs::create_dir_all(&install_dir).unwrap();
    let source = Arc::new(GatedSource::new("1.0.0:r1"));
    let orchestrator = gated_orchestrator(&install_dir, &source);

    let _other_process = UpdateLock::try_acquire(&install_dir).await.unwrap();
    let err = orchestrator.start_update().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::OperationInProgress);
    assert_eq!(orchestrator.state(), UpdateState::Idle);
    assert!(!install_dir.join(".version").exists());
}

#[test]
fn test_outcome_serialization() {
    let outcome = UpdateOutcome {
        update_available: true,
        version: "1.4.2:beta".parse().unwrap(),
        local: "1.4.1:beta".parse().unwrap(),
    };

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["version"], "1.4.2");
    assert_eq!(json["release"], "beta");
    assert_eq!(json["update_available"], true);
    assert_eq!(json["local"], "1.4.1:beta");
}

#[test]
fn test_state_display() {
    assert_eq!(UpdateState::UpdateAvailable.to_string(), "update available");
    assert_eq!(UpdateState::default(), UpdateState::Idle);
}
