use super::{CliConfig, ERR_START, MSG_STARTED};
use crate::launcher::Launcher;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

/// Runs without a configured remote source.
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Arguments passed to the application
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl RunCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let launcher_config = config.load_launcher_config().await.context(ERR_START)?;
        let launcher = Launcher::from_config(&launcher_config).context(ERR_START)?.args(self.args);

        let app = launcher.run_app().await.context(ERR_START)?;
        println!("{}", MSG_STARTED.green());
        if let Some(pid) = app.pid {
            println!("{} (pid {pid})", app.executable.display());
        }
        Ok(())
    }
}
