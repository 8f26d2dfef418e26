use super::{CliConfig, ERR_CHECK, MSG_UP_TO_DATE, MSG_UPDATE_AVAILABLE};
use crate::upgrade::UpdateOutcome;
use crate::utils::progress::ProgressBar;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let session = config.session().await.context(ERR_CHECK)?;

        let spinner = ProgressBar::spinner(
            format!("Checking {}", session.source().describe()),
            config.show_progress() && !self.json,
        );
        let outcome = session.check_version().await;
        spinner.finish_and_clear();
        let outcome = outcome.context(ERR_CHECK)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            print_outcome(&outcome);
        }
        Ok(())
    }
}

pub(super) fn print_outcome(outcome: &UpdateOutcome) {
    println!("Installed: {}", outcome.local.to_string().cyan());
    println!("Published: {}", outcome.version.to_string().cyan());
    if outcome.update_available {
        println!("{}", MSG_UPDATE_AVAILABLE.yellow().bold());
    } else {
        println!("{}", MSG_UP_TO_DATE.green());
    }
}
