use super::{CliConfig, ERR_CHECK, ERR_START, ERR_UPDATE, MSG_STARTED, MSG_UP_TO_DATE, MSG_UPDATE_DONE};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::warn;

/// The full start-up flow: check, update when needed, run.
#[derive(Debug, Args)]
pub struct LaunchCommand {
    /// Start the installed version without checking for updates
    #[arg(long)]
    pub offline: bool,
}

impl LaunchCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let session = config.session().await.context(ERR_START)?;

        if !self.offline {
            match session.check_version().await {
                Ok(outcome) if outcome.update_available => {
                    println!("Installing {}...", outcome.version.to_string().cyan());
                    session.start_update().await.context(ERR_UPDATE)?;
                    println!("{}", MSG_UPDATE_DONE.green());
                }
                Ok(_) => println!("{}", MSG_UP_TO_DATE.green()),
                Err(e) => {
                    // Fall back to the installed copy when there is one.
                    let status = session.status().await?;
                    if !status.executable_present {
                        return Err(anyhow::Error::new(e).context(ERR_CHECK));
                    }
                    warn!(error = %e, "Version check failed, starting the installed version");
                    eprintln!("{} {e}", ERR_CHECK.yellow());
                }
            }
        }

        session.run_app().await.context(ERR_START)?;
        println!("{}", MSG_STARTED.green());
        Ok(())
    }
}
