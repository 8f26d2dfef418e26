//! Global constants used throughout the launcher.
//!
//! This module contains default names, remote paths, timeout durations and
//! environment variable names that are used across multiple modules.

use std::time::Duration;

/// Default product name, used as the install subdirectory under the data dir.
pub const DEFAULT_PRODUCT: &str = "kcdmod";

/// Default name of the installed executable on Windows.
pub const DEFAULT_WINDOWS_EXECUTABLE: &str = "KCDMOD.exe";

/// Default name of the installed executable on other platforms.
///
/// Packages published for the original launcher ship only the Windows binary,
/// so the same name is used unless the config says otherwise.
pub const DEFAULT_EXECUTABLE: &str = "KCDMOD.exe";

/// Name of the persisted local version record inside the install directory.
pub const VERSION_FILE: &str = ".version";

/// Name of the cross-process update lock inside the install directory.
pub const UPDATE_LOCK_FILE: &str = ".update.lock";

/// Separator between the numeric part and the release tag of a version record.
pub const VERSION_SEPARATOR: char = ':';

/// Release tag of the sentinel record written on first run.
pub const DEFAULT_RELEASE_TAG: &str = "alpha";

/// Base URL of the GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Branch that releases are published on.
pub const DEFAULT_BRANCH: &str = "main";

/// Repository path of the remote version descriptor.
pub const DEFAULT_VERSION_PATH: &str = ".version";

/// Repository path of the release archive.
pub const DEFAULT_PACKAGE_PATH: &str = "kcdmod.zip";

/// Media type asking the contents API for the raw file body.
pub const GITHUB_RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// Connect timeout for all HTTP requests (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Total timeout for the version descriptor request (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum gap between two package chunks before the download is abandoned
/// (60 seconds).
///
/// Package downloads have no total limit since archive size is unknown.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Environment variable names read by the configuration layer.
pub mod env {
    /// Access token for the GitHub contents API.
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
    /// Repository owner (organisation or user).
    pub const GITHUB_ORG: &str = "GITHUB_ORG";
    /// Repository name.
    pub const GITHUB_REPO: &str = "GITHUB_REPO";
    /// Direct URL of the version descriptor; selects the direct transport.
    pub const VERSION_URL: &str = "KCDMOD_VERSION_URL";
    /// Direct URL of the release archive.
    pub const PACKAGE_URL: &str = "KCDMOD_PACKAGE_URL";
    /// Install directory override.
    pub const INSTALL_DIR: &str = "KCDMOD_INSTALL_DIR";
    /// Config file override.
    pub const CONFIG: &str = "KCDMOD_LAUNCHER_CONFIG";
    /// Disables the download progress bar when set.
    pub const NO_PROGRESS: &str = "KCDMOD_NO_PROGRESS";
}
