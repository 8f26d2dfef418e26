//! User-facing error formatting.
//!
//! Converts any error reaching the CLI boundary into an [`ErrorContext`] with a
//! suggestion tailored to the failure kind.

use super::error::{ErrorContext, LauncherError};

/// Keywords that indicate network-related errors in foreign error chains
const NETWORK_ERROR_KEYWORDS: &[&str] = &["network", "connection", "timeout", "dns"];

/// Convert any error into a user-friendly format with contextual suggestions.
///
/// Walks the error chain looking for a [`LauncherError`] (which may have been
/// wrapped by `anyhow::Context`); falls back to keyword matching for foreign
/// errors.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(launcher_error) = cause.downcast_ref::<LauncherError>() {
            let mut ctx = create_error_context(launcher_error);
            // Prefix the outermost anyhow context when it adds information.
            let top = error.to_string();
            if top != ctx.message {
                ctx.message = format!("{top} {}", ctx.message);
            }
            return ctx;
        }
    }

    let error_msg = format!("{error:#}");

    if NETWORK_ERROR_KEYWORDS.iter().any(|keyword| error_msg.to_lowercase().contains(keyword)) {
        return ErrorContext::new(error_msg)
            .with_suggestion("Check your internet connection and try again");
    }

    ErrorContext::new(error_msg)
        .with_suggestion("Run again with --verbose for more details")
        .with_details("An unexpected error occurred. Please report this issue if it persists.")
}

/// Build the user-facing context for a specific [`LauncherError`].
#[must_use]
pub fn create_error_context(error: &LauncherError) -> ErrorContext {
    let ctx = ErrorContext::new(error).with_kind(error.kind());
    match error {
        LauncherError::Configuration {
            ..
        } => ctx
            .with_suggestion(
                "Set the remote source in the config file or via GITHUB_ORG, GITHUB_REPO and GITHUB_TOKEN",
            )
            .with_details("The launcher needs to know where releases are published before it can check for updates"),
        LauncherError::MalformedVersion {
            ..
        } => ctx
            .with_suggestion("Version records must look like MAJOR.MINOR.PATCH:RELEASE, e.g. 1.4.2:beta")
            .with_details("Either the local .version file or the remote version descriptor is malformed"),
        LauncherError::Network {
            ..
        } => ctx
            .with_suggestion("Check your internet connection and the access token, then try again"),
        LauncherError::Timeout {
            ..
        } => ctx.with_suggestion(
            "The remote source is slow or unreachable; try again or raise the [network] timeouts",
        ),
        LauncherError::Storage {
            source,
            ..
        } => {
            let suggestion = if source.kind() == std::io::ErrorKind::PermissionDenied {
                "Check file permissions on the install directory"
            } else {
                "Check that the install directory exists and the disk is not full"
            };
            ctx.with_suggestion(suggestion).with_details(format!("I/O error: {source}"))
        }
        LauncherError::Install {
            ..
        } => ctx
            .with_suggestion("Run the update again; each attempt starts from scratch")
            .with_details("The previously installed version record was left unchanged"),
        LauncherError::Launch {
            ..
        } => ctx.with_suggestion("Run 'update' to (re)install the application"),
        LauncherError::OperationInProgress => {
            ctx.with_suggestion("Wait for the running update to finish")
        }
    }
}
