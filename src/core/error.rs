//! Error handling for the launcher
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`LauncherError`]) returned by every component, so
//!    callers can match on the failure kind (e.g. reject a second update with
//!    [`LauncherError::OperationInProgress`]).
//! 2. **User-friendly messages** ([`ErrorContext`]) with details and an actionable
//!    suggestion, rendered by the command-line front end.
//!
//! # Error Categories
//!
//! | Variant | Raised by | Caller impact |
//! |---------|-----------|---------------|
//! | [`LauncherError::Configuration`] | config loading, remote source construction | fatal, no network call made |
//! | [`LauncherError::MalformedVersion`] | version parsing (local or remote) | fatal for that call |
//! | [`LauncherError::Network`] | HTTP transport, non-success status | surfaced, no automatic retry |
//! | [`LauncherError::Timeout`] | bounded network calls | surfaced, no automatic retry |
//! | [`LauncherError::Storage`] | local version record, install directory | fatal for that call |
//! | [`LauncherError::Install`] | download-to-disk, extraction, shortcut creation | update ends in `Failed` |
//! | [`LauncherError::Launch`] | starting the installed executable | failed launch only |
//! | [`LauncherError::OperationInProgress`] | re-entrant update attempts | request rejected |
//!
//! # Examples
//!
//! ```rust,no_run
//! use kcdmod_launcher::core::{ErrorKind, LauncherError};
//!
//! fn describe(err: &LauncherError) -> &'static str {
//!     match err.kind() {
//!         ErrorKind::OperationInProgress => "an update is already running",
//!         ErrorKind::Network | ErrorKind::Timeout => "check your connection",
//!         _ => "update failed",
//!     }
//! }
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result alias used by all launcher components.
pub type Result<T, E = LauncherError> = std::result::Result<T, E>;

/// The main error type for launcher operations.
///
/// Every variant carries enough context (operation, path, URL or reason) to be
/// logged at the orchestrator boundary and shown to the user without further
/// wrapping.
#[derive(Error, Debug)]
pub enum LauncherError {
    /// Remote source settings are missing or invalid.
    ///
    /// Raised before any network call is attempted.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the missing or invalid setting
        message: String,
    },

    /// A version string could not be parsed into a version record.
    #[error("Malformed version '{raw}': {reason}")]
    MalformedVersion {
        /// The raw text that failed to parse
        raw: String,
        /// Why it was rejected
        reason: String,
    },

    /// Transport failure or non-success HTTP status.
    #[error("Network error during {operation}: {reason}")]
    Network {
        /// The network operation that failed (e.g. "fetch version descriptor")
        operation: String,
        /// Underlying transport error or HTTP status
        reason: String,
    },

    /// A bounded network call did not complete in time.
    #[error("Timed out during {operation} after {}s", .after.as_secs())]
    Timeout {
        /// The network operation that timed out
        operation: String,
        /// The limit that elapsed
        after: Duration,
    },

    /// Reading or writing local state failed.
    #[error("Storage error: failed to {operation} '{}'", .path.display())]
    Storage {
        /// The file operation that failed (e.g. "read version record")
        operation: String,
        /// The path involved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Download-to-disk, extraction or shortcut creation failed.
    #[error("Install failed during {stage}: {reason}")]
    Install {
        /// The install stage that failed ("download", "extract", "shortcut", ...)
        stage: String,
        /// Why it failed
        reason: String,
    },

    /// The installed executable is missing or could not be started.
    #[error("Failed to launch '{}': {reason}", .path.display())]
    Launch {
        /// Path of the executable that was to be started
        path: PathBuf,
        /// Why the launch failed
        reason: String,
    },

    /// An update is already running in this or another process.
    #[error("An update is already in progress")]
    OperationInProgress,
}

/// Coarse classification of [`LauncherError`] for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    MalformedVersion,
    Network,
    Timeout,
    Storage,
    Install,
    Launch,
    OperationInProgress,
}

impl LauncherError {
    /// Build a [`LauncherError::Configuration`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Build a [`LauncherError::MalformedVersion`].
    pub fn malformed(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedVersion {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`LauncherError::Network`].
    pub fn network(operation: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Network {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`LauncherError::Storage`].
    pub fn storage(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Storage {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Build a [`LauncherError::Install`].
    pub fn install(stage: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Install {
            stage: stage.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`LauncherError::Launch`].
    pub fn launch(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::Launch {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// The coarse kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration {
                ..
            } => ErrorKind::Configuration,
            Self::MalformedVersion {
                ..
            } => ErrorKind::MalformedVersion,
            Self::Network {
                ..
            } => ErrorKind::Network,
            Self::Timeout {
                ..
            } => ErrorKind::Timeout,
            Self::Storage {
                ..
            } => ErrorKind::Storage,
            Self::Install {
                ..
            } => ErrorKind::Install,
            Self::Launch {
                ..
            } => ErrorKind::Launch,
            Self::OperationInProgress => ErrorKind::OperationInProgress,
        }
    }
}

/// Error wrapper with a user-facing message, details and a suggestion.
///
/// Produced by [`user_friendly_error`](crate::core::user_friendly_error) and
/// printed by the CLI with [`display`](ErrorContext::display).
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Headline error message
    pub message: String,
    /// Kind of the underlying launcher error, if there was one
    pub kind: Option<ErrorKind>,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with only a headline message.
    #[must_use]
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
            kind: None,
            suggestion: None,
            details: None,
        }
    }

    /// Attach the kind of the underlying error.
    #[must_use]
    pub const fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
