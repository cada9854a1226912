//! Source resolution
//!
//! Finds the tarball of the latest SCOWL release through the GitHub releases
//! API. Any failure along the way falls back to a fixed tarball URL; the
//! resolver itself never fails.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Bounded wait for the metadata endpoint
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(15);

pub const USER_AGENT: &str = concat!("five-letter-words/", env!("CARGO_PKG_VERSION"));

/// Why the metadata endpoint could not provide a tarball URL
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed release metadata: {0}")]
    Json(#[from] serde_json::Error),

    #[error("release metadata has no tarball_url")]
    MissingTarball,
}

#[derive(Debug, Deserialize)]
struct ReleaseMetadata {
    #[serde(default)]
    tarball_url: Option<String>,
    #[serde(default)]
    tag_name: Option<String>,
}

/// Where the resolved URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    Release,
    Fallback,
}

/// The archive URL to download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub url: String,
    pub tag: Option<String>,
    pub origin: SourceOrigin,
}

impl ResolvedSource {
    pub fn fallback(url: &str) -> Self {
        Self {
            url: url.to_string(),
            tag: None,
            origin: SourceOrigin::Fallback,
        }
    }
}

impl fmt::Display for ResolvedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            SourceOrigin::Release => write!(
                f,
                "{} (release {})",
                self.url,
                self.tag.as_deref().unwrap_or("unknown")
            ),
            SourceOrigin::Fallback => write!(f, "{} (fallback)", self.url),
        }
    }
}

/// Interpret a release metadata body
pub fn parse_release(body: &str) -> Result<ResolvedSource, ResolveError> {
    let metadata: ReleaseMetadata = serde_json::from_str(body)?;

    match metadata.tarball_url {
        Some(url) if !url.trim().is_empty() => Ok(ResolvedSource {
            url,
            tag: metadata.tag_name,
            origin: SourceOrigin::Release,
        }),
        _ => Err(ResolveError::MissingTarball),
    }
}

/// Resolves the archive URL, preferring the latest release
#[derive(Debug, Clone)]
pub struct SourceResolver {
    metadata_url: String,
    fallback_url: String,
    timeout: Duration,
}

impl SourceResolver {
    pub fn new(metadata_url: impl Into<String>, fallback_url: impl Into<String>) -> Self {
        Self {
            metadata_url: metadata_url.into(),
            fallback_url: fallback_url.into(),
            timeout: METADATA_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn fetch_metadata(&self) -> Result<String, ResolveError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let body = client
            .get(&self.metadata_url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()?
            .error_for_status()?
            .text()?;
        Ok(body)
    }

    /// Query the metadata endpoint, falling back on any failure
    pub fn resolve(&self) -> ResolvedSource {
        self.resolve_with(|| self.fetch_metadata())
    }

    /// Resolve using `fetch` to obtain the metadata body
    pub fn resolve_with<F>(&self, fetch: F) -> ResolvedSource
    where
        F: FnOnce() -> Result<String, ResolveError>,
    {
        match fetch().and_then(|body| parse_release(&body)) {
            Ok(source) => {
                log::debug!(
                    "latest release {}: {}",
                    source.tag.as_deref().unwrap_or("unknown"),
                    source.url
                );
                source
            }
            Err(e) => {
                log::warn!("release metadata unavailable ({}), using fallback URL", e);
                ResolvedSource::fallback(&self.fallback_url)
            }
        }
    }
}
