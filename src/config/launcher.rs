//! The launcher configuration file.
//!
//! Settings are read from `<config_dir>/kcdmod-launcher/config.toml` (or the path
//! given with `--config` / `KCDMOD_LAUNCHER_CONFIG`). A missing file yields the
//! defaults. Environment variables are applied on top of the file so existing
//! deployments that only export `GITHUB_TOKEN`, `GITHUB_ORG` and `GITHUB_REPO`
//! keep working without a config file.
//!
//! ```toml
//! [product]
//! name = "kcdmod"                # install subdirectory under the data dir
//! executable = "KCDMOD.exe"
//! windows_executable = "KCDMOD.exe"
//! # install_dir = "~/Games/kcdmod"
//!
//! [source]
//! kind = "github"                # or "direct"
//! owner = "example-org"
//! repository = "kcdmod-releases"
//! branch = "main"
//! version_path = ".version"
//! package_path = "kcdmod.zip"
//! # token = "ghp_..."            # prefer GITHUB_TOKEN
//!
//! [network]
//! connect_timeout_secs = 10
//! request_timeout_secs = 30
//! idle_timeout_secs = 60
//!
//! [update]
//! persist_on_check = false
//! create_shortcut = true
//! # shortcut_dir = "~/Desktop"
//! ```
//!
//! Loading follows the same shape as the rest of the crate's file handling:
//! I/O and TOML errors are reported through `anyhow` with the path as context,
//! while semantic problems (missing repository, empty executable name) surface
//! as [`LauncherError::Configuration`] when a component is built from the config.

use crate::constants::{
    self, DEFAULT_BRANCH, DEFAULT_CONNECT_TIMEOUT, DEFAULT_EXECUTABLE, DEFAULT_IDLE_TIMEOUT,
    DEFAULT_PACKAGE_PATH, DEFAULT_PRODUCT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_VERSION_PATH,
    DEFAULT_WINDOWS_EXECUTABLE, GITHUB_API_URL,
};
use crate::core::LauncherError;
use crate::utils::platform;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Name of the directory holding the config file under the platform config dir.
const CONFIG_DIR_NAME: &str = "kcdmod-launcher";

/// Complete launcher configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherConfig {
    /// What is installed and where.
    pub product: ProductConfig,
    /// Where releases are published.
    pub source: SourceConfig,
    /// HTTP client limits.
    pub network: NetworkConfig,
    /// Update pipeline switches.
    pub update: UpdateConfig,
}

/// The installed product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProductConfig {
    /// Product name; also the install subdirectory under the data dir.
    pub name: String,
    /// Executable entry point on non-Windows platforms.
    pub executable: String,
    /// Executable entry point on Windows.
    pub windows_executable: String,
    /// Display name of the desktop shortcut. Defaults to `name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut_name: Option<String>,
    /// Explicit install directory, replacing `<data_dir>/<name>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<String>,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PRODUCT.to_string(),
            executable: DEFAULT_EXECUTABLE.to_string(),
            windows_executable: DEFAULT_WINDOWS_EXECUTABLE.to_string(),
            shortcut_name: None,
            install_dir: None,
        }
    }
}

/// Transport used to reach the remote source.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// GitHub contents API (`/repos/{owner}/{repo}/contents/{path}`).
    #[default]
    Github,
    /// Fixed URLs for the version descriptor and the package.
    Direct,
}

/// Remote source identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Base URL of the contents API.
    pub api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub branch: String,
    pub version_path: String,
    pub package_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_url: Option<String>,
    /// Access token. Sent as `token ...` to GitHub and `Bearer ...` to direct URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Github,
            api_url: GITHUB_API_URL.to_string(),
            owner: None,
            repository: None,
            branch: DEFAULT_BRANCH.to_string(),
            version_path: DEFAULT_VERSION_PATH.to_string(),
            package_path: DEFAULT_PACKAGE_PATH.to_string(),
            version_url: None,
            package_url: None,
            token: None,
        }
    }
}

/// HTTP client limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: u64,
    /// Total time allowed for the version descriptor request.
    pub request_timeout_secs: u64,
    /// Maximum silence between two package chunks.
    pub idle_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT.as_secs(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT.as_secs(),
            user_agent: concat!("kcdmod-launcher/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl NetworkConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

/// Update pipeline switches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpdateConfig {
    /// Persist the remote record as soon as a check finds it newer, like the
    /// original launcher did. Off by default: the record is written only after
    /// a successful install.
    pub persist_on_check: bool,
    /// Register a desktop shortcut after each install.
    pub create_shortcut: bool,
    /// Where the shortcut goes. Defaults to the user's desktop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut_dir: Option<String>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            persist_on_check: false,
            create_shortcut: true,
            shortcut_dir: None,
        }
    }
}

impl LauncherConfig {
    /// Load from the default location, falling back to defaults when absent.
    ///
    /// Environment overrides are applied afterwards.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` if given, else from the default location.
    ///
    /// A missing file is not an error; environment overrides are applied in
    /// both cases.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path),
            None => Self::default_path(),
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::load_from(&path).await?,
            Some(path) => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load a specific file without applying environment overrides.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read launcher config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse launcher config from {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Loaded launcher config");
        Ok(config)
    }

    /// The default config file path.
    ///
    /// `KCDMOD_LAUNCHER_CONFIG` wins; otherwise
    /// `<config_dir>/kcdmod-launcher/config.toml`. `None` when the platform has
    /// no config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(constants::env::CONFIG)
            && !path.trim().is_empty()
        {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Setting a direct version URL switches the source to [`SourceKind::Direct`].
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(token) = get(constants::env::GITHUB_TOKEN) {
            self.source.token = Some(token);
        }
        if let Some(owner) = get(constants::env::GITHUB_ORG) {
            self.source.owner = Some(owner);
        }
        if let Some(repository) = get(constants::env::GITHUB_REPO) {
            self.source.repository = Some(repository);
        }
        if let Some(url) = get(constants::env::VERSION_URL) {
            self.source.version_url = Some(url);
            self.source.kind = SourceKind::Direct;
        }
        if let Some(url) = get(constants::env::PACKAGE_URL) {
            self.source.package_url = Some(url);
        }
        if let Some(dir) = get(constants::env::INSTALL_DIR) {
            self.product.install_dir = Some(dir);
        }
    }

    /// The install directory: the expanded override, or `<data_dir>/<name>`.
    pub fn install_dir(&self) -> crate::core::Result<PathBuf> {
        match &self.product.install_dir {
            Some(dir) => platform::resolve_path(dir),
            None => Ok(platform::get_data_dir()?.join(&self.product.name)),
        }
    }

    /// The directory that receives the launch shortcut.
    pub fn shortcut_dir(&self) -> crate::core::Result<PathBuf> {
        match &self.update.shortcut_dir {
            Some(dir) => platform::resolve_path(dir),
            None => platform::get_desktop_dir(),
        }
    }

    /// The executable entry point for the current platform.
    #[must_use]
    pub fn executable_name(&self) -> &str {
        if platform::is_windows() {
            &self.product.windows_executable
        } else {
            &self.product.executable
        }
    }

    /// The shortcut display name.
    #[must_use]
    pub fn shortcut_name(&self) -> &str {
        self.product.shortcut_name.as_deref().unwrap_or(&self.product.name)
    }

    /// Check the product settings.
    ///
    /// Source settings are checked by [`SourceConfig::validate`] when the remote
    /// source is built, so commands that never touch the network (`status`,
    /// `run`) work without a configured source.
    pub fn validate_product(&self) -> crate::core::Result<()> {
        if self.product.name.trim().is_empty() {
            return Err(LauncherError::config("product.name must not be empty"));
        }
        if self.executable_name().trim().is_empty() {
            return Err(LauncherError::config("product.executable must not be empty"));
        }
        Ok(())
    }
}

impl SourceConfig {
    /// Fail fast on missing remote identity.
    pub fn validate(&self) -> crate::core::Result<()> {
        match self.kind {
            SourceKind::Github => {
                if self.owner.as_deref().is_none_or(|owner| owner.trim().is_empty()) {
                    return Err(LauncherError::config(
                        "source.owner is not set (config file or GITHUB_ORG)",
                    ));
                }
                if self.repository.as_deref().is_none_or(|repo| repo.trim().is_empty()) {
                    return Err(LauncherError::config(
                        "source.repository is not set (config file or GITHUB_REPO)",
                    ));
                }
                if self.api_url.trim().is_empty() {
                    return Err(LauncherError::config("source.api_url must not be empty"));
                }
            }
            SourceKind::Direct => {
                if self.version_url.as_deref().is_none_or(|url| url.trim().is_empty()) {
                    return Err(LauncherError::config(
                        "source.version_url is not set (config file or KCDMOD_VERSION_URL)",
                    ));
                }
                if self.package_url.as_deref().is_none_or(|url| url.trim().is_empty()) {
                    return Err(LauncherError::config(
                        "source.package_url is not set (config file or KCDMOD_PACKAGE_URL)",
                    ));
                }
            }
        }
        Ok(())
    }
}
