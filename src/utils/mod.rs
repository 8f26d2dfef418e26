//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - Atomic writes and directory creation
//! - [`platform`] - Data, desktop and home directory lookup, path expansion
//! - [`progress`] - Download progress bars and spinners
//!
//! # Example
//!
//! ```rust,no_run
//! use kcdmod_launcher::utils::{atomic_write, ensure_dir};
//! use std::path::Path;
//!
//! # fn example() -> kcdmod_launcher::core::Result<()> {
//! ensure_dir(Path::new("/tmp/kcdmod"))?;
//! atomic_write(Path::new("/tmp/kcdmod/.version"), b"1.0.0:beta")?;
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{atomic_write, ensure_dir};
pub use platform::{get_data_dir, get_desktop_dir, get_home_dir, is_windows, resolve_path};
pub use progress::ProgressBar;
