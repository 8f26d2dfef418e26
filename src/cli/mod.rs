//! Command-line interface for the launcher.
//!
//! Every command goes through a [`LauncherSession`] (or, for commands that
//! never touch the network, the local components directly) and renders the
//! result for a terminal or, with `--json`, for scripts.
//!
//! # Commands
//!
//! - `check` - compare the installed version with the published one
//! - `update` - check, then install when a newer release exists
//! - `run` - start the installed application
//! - `launch` - check, update if needed, then run
//! - `status` - show the install directory and installed version
//!
//! # Global options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: warnings and errors only
//! - `--config` / `-c`: launcher config file
//! - `--no-progress`: hide progress bars
//!
//! Errors are returned as `anyhow::Error` with a short headline context
//! ("Error during update.") and rendered by `main` through
//! [`user_friendly_error`](crate::core::user_friendly_error).

mod check;
mod launch;
mod run;
mod status;
mod update;


use crate::config::LauncherConfig;
use crate::session::LauncherSession;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub(crate) const MSG_UPDATE_AVAILABLE: &str = "A new version is available.";
pub(crate) const MSG_UP_TO_DATE: &str = "The application is up-to-date!";
pub(crate) const MSG_UPDATE_DONE: &str = "Update completed successfully.";
pub(crate) const MSG_STARTED: &str = "Application started.";

pub(crate) const ERR_CHECK: &str = "Error while checking version.";
pub(crate) const ERR_UPDATE: &str = "Error during update.";
pub(crate) const ERR_START: &str = "Error starting application.";

/// Settings shared by every command, derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for the crate's own targets.
    pub log_level: String,
    pub no_progress: bool,
    /// Explicit config file; `None` uses the default location.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            ..Self::default()
        }
    }

    /// Filter directive used when `RUST_LOG` is not set.
    #[must_use]
    pub fn log_filter(&self) -> String {
        format!("warn,kcdmod_launcher={}", self.log_level)
    }

    #[must_use]
    pub const fn show_progress(&self) -> bool {
        !self.no_progress
    }

    pub async fn load_launcher_config(&self) -> Result<LauncherConfig> {
        LauncherConfig::load_with_optional(self.config_path.clone()).await
    }

    pub async fn session(&self) -> Result<LauncherSession> {
        let config = self.load_launcher_config().await?;
        Ok(LauncherSession::from_config(&config, self.show_progress())?)
    }
}

#[derive(Parser)]
#[command(
    name = "kcdmod-launcher",
    about = "Keep an application up to date and start it",
    version,
    long_about = "Checks a remote source for new releases of the application, installs them \
                  into the local data directory and starts the installed executable."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the launcher config file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Hide progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a new version is available
    Check(check::CheckCommand),

    /// Install the latest version when it is newer than the installed one
    Update(update::UpdateCommand),

    /// Start the installed application
    Run(run::RunCommand),

    /// Check, update if needed, then start the application
    Launch(launch::LaunchCommand),

    /// Show the install directory and installed version
    Status(status::StatusCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Check(cmd) => cmd.execute(&config).await,
            Commands::Update(cmd) => cmd.execute(&config).await,
            Commands::Run(cmd) => cmd.execute(&config).await,
            Commands::Launch(cmd) => cmd.execute(&config).await,
            Commands::Status(cmd) => cmd.execute(&config).await,
        }
    }
}
