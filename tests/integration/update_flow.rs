//! The full check/update/run pipeline through `LauncherSession`.

use crate::common::{LauncherEnv, release_archive};
use kcdmod_launcher::core::ErrorKind;
use kcdmod_launcher::session::LauncherSession;
use kcdmod_launcher::test_utils::init_test_logging;
use kcdmod_launcher::upgrade::UpdateState;
use mockito::Server;

#[tokio::test]
async fn test_first_run_check_update_and_recheck() {
    init_test_logging(None);
    let env = LauncherEnv::new();
    let mut server = Server::new_async().await;
    let _version = server
        .mock("GET", "/version.txt")
        .with_body("1.4.2:beta\n")
        .create_async()
        .await;
    let package = server
        .mock("GET", "/kcdmod.zip")
        .with_body(release_archive())
        .expect(1)
        .create_async()
        .await;

    let session = LauncherSession::from_config(&env.direct_config(&server.url()), false).unwrap();

    // First check initializes the local record and leaves it at the sentinel.
    let outcome = session.check_version().await.unwrap();
    assert!(outcome.update_available);
    assert_eq!(outcome.version.numeric_string(), "1.4.2");
    assert_eq!(outcome.version.release_tag(), "beta");
    assert_eq!(env.local_version().as_deref(), Some("0.0.0:alpha"));

    let installed = session.start_update().await.unwrap();
    assert_eq!(installed.version.to_string(), "1.4.2:beta");
    assert_eq!(installed.previous.to_string(), "0.0.0:alpha");
    assert_eq!(session.state(), UpdateState::Installed);
    assert_eq!(env.local_version().as_deref(), Some("1.4.2:beta"));

    let install_dir = env.install_dir();
    assert!(install_dir.join("KCDMOD.exe").is_file());
    assert_eq!(
        std::fs::read_to_string(install_dir.join("data/readme.txt")).unwrap(),
        "release notes"
    );
    assert!(install_dir.join("mods").is_dir());
    assert!(installed.shortcut.as_ref().is_some_and(|path| path.starts_with(env.shortcut_dir())));

    // Nothing left behind besides the release tree and launcher files.
    let mut names: Vec<String> = std::fs::read_dir(&install_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, [".update.lock", ".version", "KCDMOD.exe", "data", "mods"]);

    let outcome = session.check_version().await.unwrap();
    assert!(!outcome.update_available);
    assert_eq!(session.state(), UpdateState::UpToDate);
    package.assert_async().await;
}

#[tokio::test]
async fn test_network_failure_during_package_fetch_keeps_version() {
    let env = LauncherEnv::new();
    let mut server = Server::new_async().await;
    let _version = server
        .mock("GET", "/version.txt")
        .with_body("2.0.0:r1")
        .create_async()
        .await;
    let _package = server.mock("GET", "/kcdmod.zip").with_status(500).create_async().await;

    std::fs::create_dir_all(env.install_dir()).unwrap();
    std::fs::write(env.install_dir().join(".version"), "1.0.0:r1").unwrap();

    let session = LauncherSession::from_config(&env.direct_config(&server.url()), false).unwrap();
    let err = session.start_update().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(session.state(), UpdateState::Failed);
    assert_eq!(env.local_version().as_deref(), Some("1.0.0:r1"));

    // The failed attempt still reports the update on the next check.
    let outcome = session.check_version().await.unwrap();
    assert!(outcome.update_available);
}

#[tokio::test]
async fn test_truncated_package_is_rejected() {
    let env = LauncherEnv::new();
    let mut server = Server::new_async().await;
    let _version = server
        .mock("GET", "/version.txt")
        .with_body("2.0.0:r1")
        .create_async()
        .await;
    let archive = release_archive();
    let _package = server
        .mock("GET", "/kcdmod.zip")
        .with_body(&archive[..archive.len() / 2])
        .create_async()
        .await;

    let session = LauncherSession::from_config(&env.direct_config(&server.url()), false).unwrap();
    let err = session.start_update().await.unwrap_err();

    assert!(matches!(err.kind(), ErrorKind::Install | ErrorKind::Network));
    assert_eq!(env.local_version().as_deref(), Some("0.0.0:alpha"));
}

#[tokio::test]
async fn test_malformed_remote_version() {
    let env = LauncherEnv::new();
    let mut server = Server::new_async().await;
    let _version = server
        .mock("GET", "/version.txt")
        .with_body("1.2.3")
        .create_async()
        .await;

    let session = LauncherSession::from_config(&env.direct_config(&server.url()), false).unwrap();
    let err = session.check_version().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedVersion);
    assert_eq!(session.state(), UpdateState::Idle);
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_installed_application() {
    let env = LauncherEnv::new();
    let mut server = Server::new_async().await;
    let _version = server
        .mock("GET", "/version.txt")
        .with_body("1.0.0:r1")
        .create_async()
        .await;
    let _package = server
        .mock("GET", "/kcdmod.zip")
        .with_body(release_archive())
        .create_async()
        .await;

    let session = LauncherSession::from_config(&env.direct_config(&server.url()), false).unwrap();
    assert_eq!(session.run_app().await.unwrap_err().kind(), ErrorKind::Launch);

    session.start_update().await.unwrap();
    let app = session.run_app().await.unwrap();
    assert!(app.wait().await.unwrap().success());
}
