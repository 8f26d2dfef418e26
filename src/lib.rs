//! kcdmod-launcher - a self-updating application launcher
//!
//! Keeps a locally installed application in step with the release published on
//! a remote source, and starts it.
//!
//! # Architecture Overview
//!
//! The install directory holds the extracted application and a one-line
//! version record (`<install_dir>/.version`, e.g. `1.4.2:beta`). A remote
//! source publishes a version descriptor in the same format next to a ZIP
//! package of the application tree.
//!
//! - Checking compares the two records and never modifies the install.
//! - Updating re-fetches the remote record, streams the package into a
//!   temporary file, extracts it over the install directory, refreshes the
//!   desktop shortcut and only then records the new version.
//! - Running starts the installed executable as a detached process.
//!
//! # Core Modules
//!
//! ## Pipeline
//! - [`version`] - version record parsing, formatting and comparison
//! - [`state`] - the install directory and its persisted version record
//! - [`source`] - remote sources (GitHub contents API or direct URLs)
//! - [`upgrade`] - the update orchestrator and its state machine
//! - [`launcher`] - starting the installed executable
//! - [`session`] - one instance of each component, handed to a front end
//!
//! ## Supporting Modules
//! - [`installer`] - download to a scoped temp file, ZIP extraction, install lock
//! - [`platform`] - launch shortcuts per operating system
//! - [`config`] - the TOML launcher configuration and environment overrides
//! - [`core`] - error types and user-facing error rendering
//! - [`cli`] - the command-line front end
//! - [`utils`] - atomic writes, platform directories, progress bars
//!
//! # Example
//!
//! ```rust,no_run
//! use kcdmod_launcher::config::LauncherConfig;
//! use kcdmod_launcher::session::LauncherSession;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = LauncherConfig::load().await?;
//! let session = LauncherSession::from_config(&config, true)?;
//!
//! let outcome = session.check_version().await?;
//! if outcome.update_available {
//!     session.start_update().await?;
//! }
//! session.run_app().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! See [`config`] for the file format. Deployments that predate the config file
//! keep working with `GITHUB_TOKEN`, `GITHUB_ORG` and `GITHUB_REPO` alone.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod installer;
pub mod launcher;
pub mod platform;
pub mod session;
pub mod source;
pub mod state;
pub mod upgrade;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
