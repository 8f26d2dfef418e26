//! Remote release sources.
//!
//! A [`RemoteSource`] answers two questions: what is the latest published
//! version, and where are its bytes. The orchestrator only talks to this trait,
//! so tests and alternative hosting providers plug in without touching the
//! update pipeline.
//!
//! # Implementations
//!
//! - [`HttpSource`] - GitHub contents API or fixed URLs, selected by
//!   `source.kind` in the config
//!
//! # Streaming
//!
//! Packages are returned as a [`PackageStream`] of [`Bytes`] chunks. The
//! installer writes chunks to disk as they arrive, so archive size never
//! dictates memory use.

pub mod http;

pub use http::HttpSource;

use crate::core::Result;
use crate::version::VersionRecord;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use std::fmt;

/// Chunks of a package body.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Where to fetch a package from: a URL plus the request headers it needs.
///
/// Opaque to everything except the [`RemoteSource`] that produced it. Header
/// values may hold credentials, so `Debug` prints header names only.
#[derive(Clone, PartialEq, Eq)]
pub struct PackageLocator {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl PackageLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl fmt::Debug for PackageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("PackageLocator").field("url", &self.url).field("headers", &names).finish()
    }
}

/// A remote release: its version and where to get its package.
///
/// Fetched fresh for every update, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePackageRef {
    pub version: VersionRecord,
    pub locator: PackageLocator,
}

/// An open package download.
pub struct PackageStream {
    /// Size announced by the server, if any.
    pub content_length: Option<u64>,
    pub bytes: ByteStream,
}

impl fmt::Debug for PackageStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageStream").field("content_length", &self.content_length).finish()
    }
}

/// A hosting provider that publishes a version descriptor and a package.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch and parse the remote version descriptor.
    ///
    /// # Errors
    ///
    /// `Network` on transport failure or non-success status, `Timeout` when the
    /// request limit elapses, `MalformedVersion` when the descriptor does not
    /// parse.
    async fn fetch_version_record(&self) -> Result<VersionRecord>;

    /// Fetch the current version together with the package locator.
    async fn fetch_package(&self) -> Result<RemotePackageRef>;

    /// Open the package body for streaming.
    ///
    /// # Errors
    ///
    /// `Network` or `Timeout`, either when opening the download or from the
    /// stream itself while chunks are read.
    async fn fetch_package_stream(&self, locator: &PackageLocator) -> Result<PackageStream>;

    /// Short human-readable description for logs and `status`.
    fn describe(&self) -> String;
}
