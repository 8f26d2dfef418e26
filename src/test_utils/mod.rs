//! Test utilities for the launcher
//!
//! Helpers shared by unit tests and the integration suite:
//! - [`init_test_logging`] - one-time tracing setup using the test writer
//! - [`ZipFixture`] - builds release archives in memory or on disk
//!
//! # Example
//!
//! ```rust,no_run
//! use kcdmod_launcher::test_utils::{ZipFixture, init_test_logging};
//!
//! init_test_logging(None);
//! let bytes = ZipFixture::new().file("KCDMOD.exe", b"binary").to_bytes();
//! assert!(!bytes.is_empty());
//! ```

pub mod fixtures;

pub use fixtures::ZipFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` if given, else `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=kcdmod_launcher=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
