//! The update decision: is the remote record newer than the local one?
//!
//! Numeric parts are compared element-wise after padding the shorter list with
//! trailing zeros, so `1.10.0` is newer than `1.9.0` and `1.0` equals `1.0.0`.
//! When all numeric parts are equal the release tag decides: any textual
//! difference counts as newer. A re-tagged release without a version bump
//! therefore still triggers an update.

use super::VersionRecord;
use std::cmp::Ordering;

/// Compare only the numeric parts, padding with trailing zeros.
///
/// ```rust
/// use kcdmod_launcher::version::{VersionRecord, numeric_cmp};
/// use std::cmp::Ordering;
///
/// let a: VersionRecord = "1.2:x".parse().unwrap();
/// let b: VersionRecord = "1.2.0.0:y".parse().unwrap();
/// assert_eq!(numeric_cmp(&a, &b), Ordering::Equal);
/// ```
#[must_use]
pub fn numeric_cmp(a: &VersionRecord, b: &VersionRecord) -> Ordering {
    let (a, b) = (a.numeric_parts(), b.numeric_parts());
    let len = a.len().max(b.len());

    for i in 0..len {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        match left.cmp(&right) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }

    Ordering::Equal
}

/// Returns `true` when `remote` should replace `local`.
#[must_use]
pub fn is_newer(local: &VersionRecord, remote: &VersionRecord) -> bool {
    match numeric_cmp(remote, local) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => remote.release_tag() != local.release_tag(),
    }
}
