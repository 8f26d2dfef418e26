//! Version records and their textual codec.
//!
//! A version record identifies a release by an ordered list of numeric parts and
//! a release tag, written as `MAJOR.MINOR.PATCH[.MORE...]:RELEASE`:
//!
//! ```text
//! 1.4.2:beta
//! 2.0.0.17:r1
//! 0.0.0:alpha      <- sentinel written on first run
//! ```
//!
//! Equality and comparison are defined on the parsed structure only, never on the
//! raw text; see [`comparison`] for the update decision.
//!
//! # Parsing rules
//!
//! - Surrounding whitespace (including a trailing newline) is ignored.
//! - The first `:` separates the numeric part from the release tag; the tag may
//!   itself contain `:`.
//! - A missing `:`, an empty numeric part or an empty tag is rejected with
//!   [`LauncherError::MalformedVersion`].
//! - Each numeric segment is read like a lenient integer parse: leading
//!   whitespace and a `+` sign are skipped and the leading run of digits is used
//!   (`"7rc"` is 7). A segment without leading digits (`"x"`, `""`, `"-3"`) counts
//!   as 0. Releases in the wild rely on this, so it is kept lenient.
//!
//! # Examples
//!
//! ```rust
//! use kcdmod_launcher::version::{VersionRecord, is_newer};
//!
//! let local: VersionRecord = "1.9.0:r1".parse().unwrap();
//! let remote: VersionRecord = "1.10.0:r1".parse().unwrap();
//! assert!(is_newer(&local, &remote));
//! assert_eq!(remote.to_string(), "1.10.0:r1");
//! ```

pub mod comparison;

pub use comparison::{is_newer, numeric_cmp};

use crate::constants::{DEFAULT_RELEASE_TAG, VERSION_SEPARATOR};
use crate::core::{LauncherError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A parsed `MAJOR.MINOR.PATCH...:RELEASE` identifier.
///
/// Invariants: `numeric_parts` is non-empty and `release_tag` is non-empty with
/// no surrounding whitespace or line breaks, so `parse(format(v)) == v` always
/// holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRecord {
    numeric_parts: Vec<u64>,
    release_tag: String,
}

impl VersionRecord {
    /// Build a record from its parts, enforcing the invariants.
    pub fn new(numeric_parts: Vec<u64>, release_tag: impl Into<String>) -> Result<Self> {
        let release_tag = release_tag.into();
        let describe = || {
            let parts: Vec<String> = numeric_parts.iter().map(u64::to_string).collect();
            format!("{}{VERSION_SEPARATOR}{release_tag}", parts.join("."))
        };

        if numeric_parts.is_empty() {
            return Err(LauncherError::malformed(describe(), "no numeric version parts"));
        }
        if release_tag.is_empty() {
            return Err(LauncherError::malformed(describe(), "release tag is empty"));
        }
        if release_tag.trim() != release_tag || release_tag.contains(['\n', '\r']) {
            return Err(LauncherError::malformed(
                describe(),
                "release tag must not contain surrounding whitespace or line breaks",
            ));
        }

        Ok(Self {
            numeric_parts,
            release_tag,
        })
    }

    /// The record written to a fresh install directory (`0.0.0:alpha`).
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            numeric_parts: vec![0, 0, 0],
            release_tag: DEFAULT_RELEASE_TAG.to_string(),
        }
    }

    /// Parse the textual form. See the [module docs](self) for the rules.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let Some((numeric, tag)) = trimmed.split_once(VERSION_SEPARATOR) else {
            return Err(LauncherError::malformed(
                trimmed,
                format!("missing '{VERSION_SEPARATOR}' separator between version and release"),
            ));
        };

        if numeric.trim().is_empty() {
            return Err(LauncherError::malformed(trimmed, "numeric version is empty"));
        }
        if tag.trim().is_empty() {
            return Err(LauncherError::malformed(trimmed, "release tag is empty"));
        }

        let numeric_parts = numeric.split('.').map(lenient_segment).collect();
        Self::new(numeric_parts, tag.trim())
    }

    /// The numeric parts, most significant first.
    #[must_use]
    pub fn numeric_parts(&self) -> &[u64] {
        &self.numeric_parts
    }

    /// The release tag (text after the separator).
    #[must_use]
    pub fn release_tag(&self) -> &str {
        &self.release_tag
    }

    /// The numeric part rendered as `MAJOR.MINOR.PATCH...`.
    #[must_use]
    pub fn numeric_string(&self) -> String {
        let parts: Vec<String> = self.numeric_parts.iter().map(u64::to_string).collect();
        parts.join(".")
    }
}

/// Read one numeric segment the lenient way: leading digits or 0.
fn lenient_segment(segment: &str) -> u64 {
    let segment = segment.trim_start();
    let segment = segment.strip_prefix('+').unwrap_or(segment);
    let digits_end = segment.find(|c: char| !c.is_ascii_digit()).unwrap_or(segment.len());
    let digits = &segment[..digits_end];

    if digits.is_empty() {
        return 0;
    }
    // Only overflow can fail here; saturate instead of wrapping.
    digits.parse().unwrap_or(u64::MAX)
}

impl Default for VersionRecord {
    fn default() -> Self {
        Self::sentinel()
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{VERSION_SEPARATOR}{}", self.numeric_string(), self.release_tag)
    }
}

impl FromStr for VersionRecord {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for VersionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
