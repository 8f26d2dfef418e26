//! Streaming a package into a scoped temporary file.

use crate::core::{LauncherError, Result};
use crate::source::PackageStream;
use crate::utils::ProgressBar;
use futures::StreamExt;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

const STAGE: &str = "download";

/// A package written to disk.
///
/// The file is deleted when this value is dropped, whichever way the update
/// ends.
#[derive(Debug)]
pub struct DownloadedPackage {
    file: NamedTempFile,
    bytes: u64,
}

impl DownloadedPackage {
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of bytes written.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.bytes
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes == 0
    }
}

/// Drain `stream` into a new temporary file.
///
/// Network and timeout errors from the stream pass through unchanged; local
/// file errors become [`LauncherError::Install`]. On any error the partial file
/// is removed before returning.
pub async fn download_to_temp(
    stream: PackageStream,
    progress: &ProgressBar,
) -> Result<DownloadedPackage> {
    let temp = tempfile::Builder::new()
        .prefix("kcdmod-package-")
        .suffix(".zip")
        .tempfile()
        .map_err(|e| LauncherError::install(STAGE, format!("cannot create temporary file: {e}")))?;

    let handle = temp
        .reopen()
        .map_err(|e| LauncherError::install(STAGE, format!("cannot open temporary file: {e}")))?;
    let mut file = tokio::fs::File::from_std(handle);

    let PackageStream {
        content_length,
        mut bytes,
    } = stream;
    let mut written: u64 = 0;

    while let Some(chunk) = bytes.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| LauncherError::install(STAGE, format!("write failed: {e}")))?;
        written += chunk.len() as u64;
        progress.inc(chunk.len() as u64);
    }

    file.flush().await.map_err(|e| LauncherError::install(STAGE, format!("flush failed: {e}")))?;
    file.sync_all()
        .await
        .map_err(|e| LauncherError::install(STAGE, format!("sync failed: {e}")))?;

    if let Some(expected) = content_length
        && expected != written
    {
        return Err(LauncherError::network(
            "download package",
            format!("connection closed after {written} of {expected} bytes"),
        ));
    }

    debug!(path = %temp.path().display(), bytes = written, "Package downloaded");
    Ok(DownloadedPackage {
        file: temp,
        bytes: written,
    })
}
