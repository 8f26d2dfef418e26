//! HTTP implementation of [`RemoteSource`].
//!
//! Two transports share one client:
//!
//! - **GitHub** - `GET {api}/repos/{owner}/{repo}/contents/{path}?ref={branch}`
//!   with `Authorization: token ...` and the raw media type. When the API
//!   answers with the JSON envelope anyway (`{"content": "<base64>", ...}`), the
//!   `content` field is decoded.
//! - **Direct** - plain `GET` on `version_url` and `package_url`, with an
//!   optional `Authorization: Bearer ...`.
//!
//! Missing settings are rejected in [`HttpSource::from_config`], before any
//! request is made.

use super::{PackageLocator, PackageStream, RemotePackageRef, RemoteSource};
use crate::config::{LauncherConfig, SourceConfig, SourceKind};
use crate::constants::GITHUB_RAW_MEDIA_TYPE;
use crate::core::{LauncherError, Result};
use crate::version::VersionRecord;
use async_trait::async_trait;
use base64::Engine as _;
use futures::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const FETCH_VERSION: &str = "fetch version descriptor";
const FETCH_PACKAGE: &str = "download package";

/// JSON envelope returned by the contents API without the raw media type.
#[derive(Debug, Deserialize)]
struct ContentsEnvelope {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

/// Remote source over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    kind: SourceKind,
    version_url: Url,
    package_url: Url,
    headers: Vec<(String, String)>,
    request_timeout: Duration,
    idle_timeout: Duration,
}

impl HttpSource {
    /// Build a source from the launcher config.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Configuration`] when the remote identity is missing,
    /// a URL does not parse, or the HTTP client cannot be built.
    pub fn from_config(config: &LauncherConfig) -> Result<Self> {
        let source = &config.source;
        source.validate()?;

        let client = Client::builder()
            .user_agent(&config.network.user_agent)
            .connect_timeout(config.network.connect_timeout())
            .build()
            .map_err(|e| LauncherError::config(format!("failed to build HTTP client: {e}")))?;

        let (version_url, package_url, headers) = match source.kind {
            SourceKind::Github => github_endpoints(source)?,
            SourceKind::Direct => direct_endpoints(source)?,
        };

        Ok(Self {
            client,
            kind: source.kind,
            version_url,
            package_url,
            headers,
            request_timeout: config.network.request_timeout(),
            idle_timeout: config.network.idle_timeout(),
        })
    }

    /// URL of the version descriptor.
    #[must_use]
    pub fn version_url(&self) -> &Url {
        &self.version_url
    }

    /// URL of the package.
    #[must_use]
    pub fn package_url(&self) -> &Url {
        &self.package_url
    }

    fn request(&self, url: &str, headers: &[(String, String)]) -> reqwest::RequestBuilder {
        headers.iter().fold(self.client.get(url), |request, (name, value)| {
            request.header(name.as_str(), value.as_str())
        })
    }

    /// Interpret a version descriptor body.
    fn decode_version_body(&self, body: &str) -> Result<VersionRecord> {
        if self.kind == SourceKind::Github
            && body.trim_start().starts_with('{')
            && let Ok(envelope) = serde_json::from_str::<ContentsEnvelope>(body)
        {
            if let Some(encoding) = envelope.encoding.as_deref()
                && encoding != "base64"
            {
                return Err(LauncherError::network(
                    FETCH_VERSION,
                    format!("unsupported content encoding '{encoding}'"),
                ));
            }
            let text = decode_base64_content(&envelope.content)?;
            return VersionRecord::parse(&text);
        }
        VersionRecord::parse(body)
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn fetch_version_record(&self) -> Result<VersionRecord> {
        debug!(url = %self.version_url, "Fetching remote version descriptor");

        let response = self
            .request(self.version_url.as_str(), &self.headers)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(FETCH_VERSION, &e, self.request_timeout))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, url = %self.version_url, "Version descriptor request failed");
            return Err(LauncherError::network(
                FETCH_VERSION,
                format!("HTTP {status} from {}", self.version_url),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(FETCH_VERSION, &e, self.request_timeout))?;

        let version = self.decode_version_body(&body)?;
        debug!(version = %version, "Fetched remote version");
        Ok(version)
    }

    async fn fetch_package(&self) -> Result<RemotePackageRef> {
        let version = self.fetch_version_record().await?;
        let locator = self
            .headers
            .iter()
            .fold(PackageLocator::new(self.package_url.as_str()), |locator, (name, value)| {
                locator.with_header(name.clone(), value.clone())
            });
        Ok(RemotePackageRef {
            version,
            locator,
        })
    }

    async fn fetch_package_stream(&self, locator: &PackageLocator) -> Result<PackageStream> {
        debug!(url = %locator.url, "Opening package download");

        // The request timeout bounds the wait for response headers only; the
        // body is bounded per chunk by the idle timeout.
        let send = self.request(&locator.url, &locator.headers).send();
        let response = match tokio::time::timeout(self.request_timeout, send).await {
            Ok(result) => {
                result.map_err(|e| map_transport_error(FETCH_PACKAGE, &e, self.request_timeout))?
            }
            Err(_) => {
                return Err(LauncherError::Timeout {
                    operation: FETCH_PACKAGE.to_string(),
                    after: self.request_timeout,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, url = %locator.url, "Package request failed");
            return Err(LauncherError::network(
                FETCH_PACKAGE,
                format!("HTTP {status} from {}", locator.url),
            ));
        }

        let content_length = response.content_length();
        let idle = self.idle_timeout;
        let inner = response.bytes_stream().boxed();

        let bytes = futures::stream::unfold(Some(inner), move |state| async move {
            let mut inner = state?;
            match tokio::time::timeout(idle, inner.next()).await {
                Ok(Some(Ok(chunk))) => Some((Ok(chunk), Some(inner))),
                Ok(Some(Err(e))) => Some((Err(map_transport_error(FETCH_PACKAGE, &e, idle)), None)),
                Ok(None) => None,
                Err(_) => Some((
                    Err(LauncherError::Timeout {
                        operation: FETCH_PACKAGE.to_string(),
                        after: idle,
                    }),
                    None,
                )),
            }
        })
        .boxed();

        Ok(PackageStream {
            content_length,
            bytes,
        })
    }

    fn describe(&self) -> String {
        match self.kind {
            SourceKind::Github => format!("GitHub contents API ({})", self.version_url),
            SourceKind::Direct => format!("direct URL ({})", self.version_url),
        }
    }
}

fn github_endpoints(source: &SourceConfig) -> Result<(Url, Url, Vec<(String, String)>)> {
    // validate() guarantees both are present.
    let owner = source.owner.as_deref().unwrap_or_default().trim();
    let repository = source.repository.as_deref().unwrap_or_default().trim();
    let api = source.api_url.trim_end_matches('/');

    let contents_url = |path: &str| -> Result<Url> {
        let raw = format!("{api}/repos/{owner}/{repository}/contents/{}", path.trim_start_matches('/'));
        Url::parse_with_params(&raw, &[("ref", source.branch.as_str())])
            .map_err(|e| LauncherError::config(format!("invalid contents URL '{raw}': {e}")))
    };

    let mut headers = vec![(ACCEPT.as_str().to_string(), GITHUB_RAW_MEDIA_TYPE.to_string())];
    if let Some(token) = source.token.as_deref().filter(|t| !t.trim().is_empty()) {
        headers.push((AUTHORIZATION.as_str().to_string(), format!("token {}", token.trim())));
    }

    Ok((contents_url(&source.version_path)?, contents_url(&source.package_path)?, headers))
}

fn direct_endpoints(source: &SourceConfig) -> Result<(Url, Url, Vec<(String, String)>)> {
    let parse = |key: &str, value: Option<&str>| -> Result<Url> {
        let raw = value.unwrap_or_default().trim();
        Url::parse(raw).map_err(|e| LauncherError::config(format!("invalid {key} '{raw}': {e}")))
    };

    let mut headers = Vec::new();
    if let Some(token) = source.token.as_deref().filter(|t| !t.trim().is_empty()) {
        headers.push((AUTHORIZATION.as_str().to_string(), format!("Bearer {}", token.trim())));
    }

    Ok((
        parse("source.version_url", source.version_url.as_deref())?,
        parse("source.package_url", source.package_url.as_deref())?,
        headers,
    ))
}

/// Decode the contents API `content` field; line breaks are ignored.
fn decode_base64_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| LauncherError::network(FETCH_VERSION, format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| LauncherError::network(FETCH_VERSION, format!("content is not UTF-8: {e}")))
}

fn map_transport_error(operation: &str, error: &reqwest::Error, limit: Duration) -> LauncherError {
    if error.is_timeout() {
        LauncherError::Timeout {
            operation: operation.to_string(),
            after: limit,
        }
    } else {
        LauncherError::network(operation, error)
    }
}
