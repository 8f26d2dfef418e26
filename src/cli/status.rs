use super::CliConfig;
use crate::launcher::Launcher;
use crate::source::{HttpSource, RemoteSource};
use crate::state::LocalStateStore;
use crate::version::VersionRecord;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    install_dir: PathBuf,
    installed_version: Option<VersionRecord>,
    executable: PathBuf,
    executable_present: bool,
    /// `None` when the remote source is not configured.
    source: Option<String>,
}

impl StatusCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let launcher_config = config.load_launcher_config().await?;
        let store = LocalStateStore::from_config(&launcher_config)?;
        let launcher = Launcher::from_config(&launcher_config)?;

        let executable = launcher.executable_path();
        let report = StatusReport {
            install_dir: store.install_dir().to_path_buf(),
            installed_version: store.read().await?,
            executable_present: tokio::fs::metadata(&executable)
                .await
                .is_ok_and(|meta| meta.is_file()),
            executable,
            source: HttpSource::from_config(&launcher_config)
                .ok()
                .map(|source| source.describe()),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("Install directory: {}", report.install_dir.display());
        match &report.installed_version {
            Some(version) => println!("Installed version: {}", version.to_string().cyan()),
            None => println!("Installed version: {}", "none".dimmed()),
        }
        let present = if report.executable_present {
            "present".green()
        } else {
            "missing".red()
        };
        println!("Executable:        {} ({present})", report.executable.display());
        match &report.source {
            Some(source) => println!("Source:            {source}"),
            None => println!("Source:            {}", "not configured".yellow()),
        }
        Ok(())
    }
}
