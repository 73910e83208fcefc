use crate::error::ShortenerError;
use async_trait::async_trait;
use jiff::Timestamp;
use snaplink_core::ShortCode;

type Result<T> = std::result::Result<T, ShortenerError>;

/// The outcome of a successful `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub short_code: ShortCode,
    /// `{base_url}/s/{short_code}`
    pub short_url: String,
    pub expires_at: Timestamp,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `raw_url` and returns the public short link.
    ///
    /// Submitting the same URL again yields the same code and refreshes its
    /// expiry. Two different URLs whose digests share the 8-character prefix
    /// overwrite each other.
    async fn create(&self, raw_url: &str) -> Result<CreatedLink>;
}
