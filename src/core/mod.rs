//! Core types shared by every launcher component.
//!
//! - [`LauncherError`] - the typed error taxonomy returned by all components
//! - [`ErrorKind`] - coarse classification for presentation layers
//! - [`ErrorContext`] / [`user_friendly_error`] - CLI-facing error rendering

pub mod error;
pub mod error_formatting;

pub use error::{ErrorContext, ErrorKind, LauncherError, Result};
pub use error_formatting::{create_error_context, user_friendly_error};
