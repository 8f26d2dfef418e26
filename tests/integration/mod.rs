//! Integration test suite for kcdmod-launcher
//!
//! End-to-end tests against a local `mockito` server standing in for the
//! release host.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **update_flow**: the library pipeline through `LauncherSession`
//! - **github_source**: the GitHub contents API transport
//! - **cli**: the `kcdmod-launcher` binary, driven with `assert_cmd`

mod common;

mod cli;
mod github_source;
mod update_flow;
