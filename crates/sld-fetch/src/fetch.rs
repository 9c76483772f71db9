//! Network fetch abstraction.
//!
//! Defines the `Fetcher` trait the enumerator pulls archive bodies through,
//! and `HttpFetcher`, the reqwest-backed implementation used by the CLI.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{SldError, SldResult};

/// Retrieves the full body behind a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the body once it has been fully received.
    ///
    /// A non-success status is an error.
    async fn fetch(&self, url: &str) -> SldResult<Vec<u8>>;
}

/// HTTP fetcher over a shared reqwest client.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with an optional whole-request timeout.
    pub fn new(timeout: Option<Duration>) -> SldResult<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("sld-fetch/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }

        let client = builder.build().map_err(SldError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> SldResult<Vec<u8>> {
        tracing::debug!(%url, "GET");

        let http_err = |source| SldError::Http {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().await.map_err(http_err)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SldError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(http_err)?;
        Ok(body.to_vec())
    }
}
