//! Remote fetching.
//!
//! [`RemoteFetcher`] is the seam between the acquisition stage and the
//! network. [`HttpFetcher`] is the real implementation: a single GET with
//! `Accept: */*`, a bounded timeout, and no retries. Any non-2xx status is
//! an error; the body is returned as raw bytes whatever its content type.

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::header::ACCEPT;

use crate::config::FetchSettings;
use crate::error::{FileMergeError, Result};

/// Fetches the bytes behind a URL.
pub trait RemoteFetcher: Send + Sync {
    /// Fetch `url` and return its body.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>>>;
}

/// HTTP(S) fetcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default 30 second timeout.
    pub fn new() -> Result<Self> {
        Self::with_settings(&FetchSettings::default())
    }

    /// Create a fetcher with custom settings.
    pub fn with_settings(settings: &FetchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|e| {
                FileMergeError::invalid_config(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }
}

impl RemoteFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
        async move {
            let http_error = |source| FileMergeError::Http {
                url: url.to_string(),
                source,
            };

            let response = self
                .client
                .get(url)
                .header(ACCEPT, "*/*")
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(http_error)?;

            tracing::debug!(
                url,
                status = %response.status(),
                content_length = ?response.content_length(),
                "remote fetch responded"
            );

            let body = response.bytes().await.map_err(http_error)?;
            Ok(body.to_vec())
        }
        .boxed()
    }
}
