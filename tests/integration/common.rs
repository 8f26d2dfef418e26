//! Shared helpers: an isolated install/config layout and release fixtures.

use assert_cmd::Command;
use kcdmod_launcher::config::{LauncherConfig, SourceKind};
use kcdmod_launcher::test_utils::ZipFixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that would leak the developer's setup into a test.
const SCRUBBED_ENV: &[&str] = &[
    "GITHUB_TOKEN",
    "GITHUB_ORG",
    "GITHUB_REPO",
    "KCDMOD_VERSION_URL",
    "KCDMOD_PACKAGE_URL",
    "KCDMOD_INSTALL_DIR",
    "KCDMOD_LAUNCHER_CONFIG",
    "RUST_LOG",
];

/// A temp directory with room for an install, a shortcut directory and a
/// config file.
pub struct LauncherEnv {
    pub temp: TempDir,
}

impl LauncherEnv {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn install_dir(&self) -> PathBuf {
        self.temp.path().join("install")
    }

    pub fn shortcut_dir(&self) -> PathBuf {
        self.temp.path().join("desktop")
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("launcher.toml")
    }

    /// A config without any remote source.
    pub fn base_config(&self) -> LauncherConfig {
        let mut config = LauncherConfig::default();
        config.product.install_dir = Some(path_string(&self.install_dir()));
        config.update.shortcut_dir = Some(path_string(&self.shortcut_dir()));
        config
    }

    /// A config pointing at `server_url/version.txt` and `server_url/kcdmod.zip`.
    pub fn direct_config(&self, server_url: &str) -> LauncherConfig {
        let mut config = self.base_config();
        config.source.kind = SourceKind::Direct;
        config.source.version_url = Some(format!("{server_url}/version.txt"));
        config.source.package_url = Some(format!("{server_url}/kcdmod.zip"));
        config
    }

    pub fn write_config(&self, config: &LauncherConfig) {
        std::fs::write(self.config_path(), toml::to_string_pretty(config).unwrap()).unwrap();
    }

    pub fn local_version(&self) -> Option<String> {
        std::fs::read_to_string(self.install_dir().join(".version")).ok()
    }

    /// The launcher binary with a scrubbed environment and this config file.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("kcdmod-launcher").unwrap();
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        cmd.env("KCDMOD_NO_PROGRESS", "1")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// A minimal release tree.
pub fn release_archive() -> Vec<u8> {
    ZipFixture::new()
        .executable("KCDMOD.exe", b"#!/bin/sh\nexit 0\n")
        .file("data/readme.txt", b"release notes")
        .directory("mods/")
        .to_bytes()
}
