//! Configuration management for the launcher.
//!
//! A single user-level TOML file, layered with environment overrides, describes
//! the installed product, the remote source and the network limits. See
//! [`launcher`] for the file format and the precedence rules.
//!
//! # Resolution order
//!
//! 1. Built-in defaults (product `kcdmod`, GitHub contents API, branch `main`)
//! 2. The config file (`--config`, `KCDMOD_LAUNCHER_CONFIG`, or
//!    `<config_dir>/kcdmod-launcher/config.toml`)
//! 3. Environment variables (`GITHUB_TOKEN`, `GITHUB_ORG`, `GITHUB_REPO`,
//!    `KCDMOD_VERSION_URL`, `KCDMOD_PACKAGE_URL`, `KCDMOD_INSTALL_DIR`)
//!
//! # Security
//!
//! Access tokens should come from the environment. A token stored in the file
//! only travels in request headers, and `PackageLocator`'s `Debug` output
//! lists header names without their values.

pub mod launcher;

pub use launcher::{
    LauncherConfig, NetworkConfig, ProductConfig, SourceConfig, SourceKind, UpdateConfig,
};
