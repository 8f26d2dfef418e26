//! The `kcdmod-launcher` binary.

use crate::common::{LauncherEnv, release_archive};
use predicates::prelude::*;

#[test]
fn test_status_json_on_fresh_machine() {
    let env = LauncherEnv::new();
    env.write_config(&env.base_config());

    let output = env.command().args(["status", "--json"]).assert().success();
    let report: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();

    assert_eq!(report["installed_version"], serde_json::Value::Null);
    assert_eq!(report["executable_present"], false);
    assert_eq!(report["source"], serde_json::Value::Null);
    assert!(report["install_dir"].as_str().unwrap().ends_with("install"));
    // Status is read-only.
    assert!(!env.install_dir().exists());
}

#[test]
fn test_check_without_source_fails() {
    let env = LauncherEnv::new();
    env.write_config(&env.base_config());

    env.command()
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error while checking version."))
        .stderr(predicate::str::contains("source.owner"));
}

#[test]
fn test_check_reports_available_update() {
    let env = LauncherEnv::new();
    let mut server = mockito::Server::new();
    let _version = server.mock("GET", "/version.txt").with_body("1.4.2:beta").create();
    env.write_config(&env.direct_config(&server.url()));

    env.command()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("A new version is available."))
        .stdout(predicate::str::contains("1.4.2:beta"));

    let output = env.command().args(["check", "--json"]).assert().success();
    let outcome: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(outcome["version"], "1.4.2");
    assert_eq!(outcome["release"], "beta");
    assert_eq!(outcome["update_available"], true);

    assert_eq!(env.local_version().as_deref(), Some("0.0.0:alpha"));
}

#[test]
fn test_version_url_from_environment() {
    let env = LauncherEnv::new();
    let mut server = mockito::Server::new();
    let _version = server.mock("GET", "/v").with_body("0.0.0:alpha").create();
    env.write_config(&env.base_config());

    env.command()
        .env("KCDMOD_VERSION_URL", format!("{}/v", server.url()))
        .env("KCDMOD_PACKAGE_URL", format!("{}/p.zip", server.url()))
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("The application is up-to-date!"));
}

#[test]
fn test_update_then_up_to_date() {
    let env = LauncherEnv::new();
    let mut server = mockito::Server::new();
    let _version = server.mock("GET", "/version.txt").with_body("1.0.0:r1").create();
    let package = server
        .mock("GET", "/kcdmod.zip")
        .with_body(release_archive())
        .expect(1)
        .create();
    env.write_config(&env.direct_config(&server.url()));

    env.command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("Update completed successfully."));

    assert_eq!(env.local_version().as_deref(), Some("1.0.0:r1"));
    assert!(env.install_dir().join("KCDMOD.exe").is_file());
    assert!(std::fs::read_dir(env.shortcut_dir()).unwrap().next().is_some());

    env.command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("The application is up-to-date!"));
    package.assert();
}

#[test]
fn test_update_failure_keeps_version() {
    let env = LauncherEnv::new();
    let mut server = mockito::Server::new();
    let _version = server.mock("GET", "/version.txt").with_body("1.0.0:r1").create();
    let _package = server.mock("GET", "/kcdmod.zip").with_status(503).create();
    env.write_config(&env.direct_config(&server.url()));

    env.command()
        .arg("update")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error during update."))
        .stderr(predicate::str::contains("503"));

    assert_eq!(env.local_version().as_deref(), Some("0.0.0:alpha"));
}

#[test]
fn test_update_json() {
    let env = LauncherEnv::new();
    let mut server = mockito::Server::new();
    let _version = server.mock("GET", "/version.txt").with_body("1.0.0:r1").create();
    let _package = server.mock("GET", "/kcdmod.zip").with_body(release_archive()).create();
    let mut config = env.direct_config(&server.url());
    config.update.create_shortcut = false;
    env.write_config(&config);

    let output = env.command().args(["update", "--json"]).assert().success();
    let report: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(report["updated"], true);
    assert_eq!(report["install"]["version"], "1.0.0:r1");
    assert_eq!(report["install"]["previous"], "0.0.0:alpha");
    assert!(!env.shortcut_dir().exists());
}

#[test]
fn test_update_reports_version_before_check_persisted() {
    let env = LauncherEnv::new();
    let mut server = mockito::Server::new();
    let _version = server.mock("GET", "/version.txt").with_body("1.0.0:r1").create();
    let _package = server.mock("GET", "/kcdmod.zip").with_body(release_archive()).create();
    let mut config = env.direct_config(&server.url());
    config.update.persist_on_check = true;
    config.update.create_shortcut = false;
    env.write_config(&config);

    env.command()
        .args(["update", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0.0:alpha -> 1.0.0:r1"));
    assert_eq!(env.local_version().as_deref(), Some("1.0.0:r1"));

    let output = env.command().args(["update", "--force", "--json"]).assert().success();
    let report: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(report["install"]["previous"], "1.0.0:r1");
}

#[test]
fn test_run_without_install_fails() {
    let env = LauncherEnv::new();
    env.write_config(&env.base_config());

    env.command()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error starting application."))
        .stderr(predicate::str::contains("KCDMOD.exe"));
}

#[cfg(unix)]
#[test]
fn test_run_starts_installed_executable() {
    use std::os::unix::fs::PermissionsExt;

    let env = LauncherEnv::new();
    env.write_config(&env.base_config());
    std::fs::create_dir_all(env.install_dir()).unwrap();
    let exe = env.install_dir().join("KCDMOD.exe");
    std::fs::write(&exe, "#!/bin/sh\ntouch started\n").unwrap();
    std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

    env.command()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Application started."));

    let marker = env.install_dir().join("started");
    for _ in 0..50 {
        if marker.exists() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(100));
    }
    assert!(marker.exists());
}

#[test]
fn test_invalid_config_file() {
    let env = LauncherEnv::new();
    std::fs::write(env.config_path(), "[product\nname = ").unwrap();

    env.command()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse launcher config"));
}
