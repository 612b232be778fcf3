use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use lt_core::ports::MirrorFetcherPort;
use lt_core::FetchError;

/// Fetches mirror payloads over HTTP(S).
///
/// Non-success status codes count as transport failures, so the pipeline
/// simply moves on to the next mirror.
#[derive(Clone)]
pub struct ReqwestMirrorFetcher {
    client: reqwest::Client,
}

impl ReqwestMirrorFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lectern/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MirrorFetcherPort for ReqwestMirrorFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::transport(url, format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(url, e))?;
        debug!(url, bytes = body.len(), "mirror responded");
        Ok(body)
    }
}
