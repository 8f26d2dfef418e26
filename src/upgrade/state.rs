use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Where the orchestrator is in the update state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateState {
    #[default]
    Idle,
    CheckingVersion,
    UpToDate,
    UpdateAvailable,
    Installing,
    Installed,
    Failed,
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::CheckingVersion => "checking version",
            Self::UpToDate => "up to date",
            Self::UpdateAvailable => "update available",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

impl UpdateState {
    /// The state to fall back to when an operation started from `self`
    /// fails. Transient states belong to another operation and settle to
    /// `Idle`.
    #[must_use]
    pub const fn settled(self) -> Self {
        match self {
            Self::CheckingVersion | Self::Installing => Self::Idle,
            other => other,
        }
    }
}

/// Lock the state cell, ignoring poisoning.
///
/// The cell holds a plain `Copy` enum, so a panic elsewhere cannot leave it
/// half-written.
pub(super) fn lock(cell: &Mutex<UpdateState>) -> MutexGuard<'_, UpdateState> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Puts the state cell into a fallback state unless the operation completes.
///
/// Covers both early `?` returns and a dropped (cancelled) future. Writes only
/// happen while the cell still holds the state this guard entered, so a
/// check finishing during an install cannot overwrite `Installing`.
pub(super) struct StateGuard<'a> {
    cell: &'a Mutex<UpdateState>,
    entered: UpdateState,
    fallback: UpdateState,
    done: bool,
}

impl<'a> StateGuard<'a> {
    /// Move `state` to `entered`, remembering where to fall back to.
    pub(super) fn enter(
        cell: &'a Mutex<UpdateState>,
        state: &mut UpdateState,
        entered: UpdateState,
    ) -> Self {
        let fallback = state.settled();
        *state = entered;
        Self {
            cell,
            entered,
            fallback,
            done: false,
        }
    }

    pub(super) const fn set_fallback(&mut self, fallback: UpdateState) {
        self.fallback = fallback;
    }

    /// Complete the operation in `state`.
    pub(super) fn finish(mut self, state: UpdateState) {
        self.write(state);
        self.done = true;
    }

    fn write(&self, state: UpdateState) {
        let mut current = lock(self.cell);
        if *current == self.entered {
            *current = state;
        }
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.write(self.fallback);
        }
    }
}
