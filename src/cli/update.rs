use super::check::print_outcome;
use super::{CliConfig, ERR_CHECK, ERR_UPDATE, MSG_UPDATE_DONE};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Reinstall even when the installed version is current
    #[arg(long)]
    pub force: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl UpdateCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let session = config.session().await.context(ERR_UPDATE)?;
        let outcome = session.check_version().await.context(ERR_CHECK)?;

        if !outcome.update_available && !self.force {
            if self.json {
                let report = serde_json::json!({ "success": true, "updated": false, "check": outcome });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_outcome(&outcome);
            }
            return Ok(());
        }

        if !outcome.update_available {
            info!(version = %outcome.version, "Reinstalling current version");
        }
        if !self.json {
            println!("Installing {}...", outcome.version.to_string().cyan());
        }

        let mut installed = session.start_update().await.context(ERR_UPDATE)?;
        // With `persist_on_check` the check above already recorded the remote
        // version; report what was installed before this command ran.
        installed.previous = outcome.local;

        if self.json {
            let report = serde_json::json!({ "success": true, "updated": true, "install": installed });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!(
                "{} ({} -> {}, {} files)",
                MSG_UPDATE_DONE.green().bold(),
                installed.previous,
                installed.version,
                installed.files
            );
            if let Some(shortcut) = &installed.shortcut {
                println!("Shortcut: {}", shortcut.display());
            }
        }
        Ok(())
    }
}
