//! Retrieval of `.svg` files referenced by URL.
//!
//! A file reference is turned into an inline one by issuing a single GET.
//! Only status 200 counts as success; any other status or a transport
//! failure is returned as a [`FetchError`] and the reference is left as it
//! was.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::reference::SvgReference;

/// The one status treated as success.
const HTTP_STATUS_OK: u16 = 200;

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

/// Issues GET requests for SVG files.
#[async_trait]
pub trait SvgFetcher: Send + Sync {
    /// Performs one GET and returns whatever status the server answered with.
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

// ============================================================================
// HttpFetcher
// ============================================================================

/// [`SvgFetcher`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Option<Url>,
}

impl HttpFetcher {
    /// Creates a fetcher with default client settings.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
        }
    }

    /// Creates a fetcher with an optional request timeout and a base URL
    /// used to resolve relative references.
    pub fn with_options(
        timeout: Option<Duration>,
        base_url: Option<&str>,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| FetchError::Transport {
            url: String::new(),
            message: e.to_string(),
        })?;
        let base_url = base_url
            .map(|base| Url::parse(base).map_err(|_| FetchError::InvalidUrl(base.to_string())))
            .transpose()?;
        Ok(Self { client, base_url })
    }

    /// Turns a reference URL into an absolute one.
    pub fn absolute_url(&self, url: &str) -> Result<Url, FetchError> {
        let resolved = match &self.base_url {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        resolved.map_err(|_| FetchError::InvalidUrl(url.to_string()))
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SvgFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let absolute = self.absolute_url(url)?;
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(absolute).send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        Ok(FetchResponse { status, body })
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Replaces a file reference with the fetched markup.
///
/// Inline references are left alone and cost no request. On failure the
/// reference is unchanged.
pub async fn resolve(
    reference: &mut SvgReference,
    fetcher: &dyn SvgFetcher,
) -> Result<(), FetchError> {
    let Some(url) = reference.source_url().map(str::to_owned) else {
        return Ok(());
    };

    debug!(url = %url, "fetching SVG file");
    let response = fetcher.get(&url).await.inspect_err(|e| {
        warn!(url = %url, error = %e, "SVG fetch failed");
    })?;

    if response.status != HTTP_STATUS_OK {
        warn!(url = %url, status = response.status, "SVG fetch returned non-OK status");
        return Err(FetchError::Status {
            url,
            status: response.status,
        });
    }

    reference.resolve_to_markup(response.body);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
