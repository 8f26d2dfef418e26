//! The update pipeline.
//!
//! [`UpdateOrchestrator`] ties the other components together: it reads the local
//! version record, asks the remote source for the published one, decides
//! whether an update is needed, and installs it.
//!
//! # State machine
//!
//! ```text
//!            check_version()                      start_update()
//! Idle ──► CheckingVersion ──► UpToDate ─────┐
//!                 │                          ├──► Installing ──► Installed
//!                 └──────────► UpdateAvailable ┘        │
//!                                                       └──────► Failed
//! ```
//!
//! - A failed check returns to the state it started from.
//! - `start_update` is accepted from any state except `Installing`, so a
//!   `Failed` update is retried by calling it again. Nothing from the failed
//!   attempt is reused.
//! - Dropping an in-flight `start_update` future leaves the state at `Failed`.
//!
//! # Safety
//!
//! The local version record is written last, only after download, extraction
//! and shortcut creation all succeed. A failure at any earlier step leaves the
//! previously installed version recorded, so the next check offers the update
//! again.
//!
//! # Concurrency
//!
//! Only one install runs at a time per install directory:
//!
//! 1. **In-process** - entering `Installing` is a compare-and-set on the state
//!    mutex; a second caller gets [`OperationInProgress`](crate::core::LauncherError::OperationInProgress)
//!    before touching the disk.
//! 2. **Cross-process** - an exclusive lock on `<install_dir>/.update.lock`
//!    ([`UpdateLock`](crate::installer::UpdateLock)).

mod orchestrator;
mod state;

#[cfg(test)]
mod tests;

pub use orchestrator::{InstallResult, ShortcutSpec, UpdateOrchestrator, UpdateOutcome};
pub use state::UpdateState;
