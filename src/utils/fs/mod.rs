//! File system helpers for the install directory.
//!
//! - [`atomic_write`] - temp file, fsync, rename
//! - [`ensure_dir`] - idempotent directory creation
//!
//! All functions are synchronous; async callers wrap them in
//! `tokio::task::spawn_blocking`.

pub mod atomic;
pub mod dirs;

pub use atomic::atomic_write;
pub use dirs::ensure_dir;
