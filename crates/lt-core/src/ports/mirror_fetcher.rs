use async_trait::async_trait;

use crate::error::FetchError;

/// One network mirror attempt. No retries at this level: the caller moves on to
/// the next mirror.
#[async_trait]
pub trait MirrorFetcherPort: Send + Sync {
    /// Fetch the raw body of `url`.
    ///
    /// Error semantics:
    /// - `Transport`: unreachable, timed out, or non-success status
    /// - `Parse`    : body could not be decoded as text
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}
