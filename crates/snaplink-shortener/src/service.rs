use crate::error::ShortenerError;
use crate::shortener::{CreatedLink, Shortener};
use async_trait::async_trait;
use snaplink_core::{Clock, Repository, ShortLinkRecord, SystemClock};
use std::sync::Arc;
use tracing::{debug, error};
use url::Url;

/// A concrete implementation of the [`Shortener`] trait.
///
/// The short code is a pure function of the raw URL string, so there is no
/// generator and no collision retry: the record is written with an
/// unconditional upsert.
#[derive(Debug, Clone)]
pub struct ShortenerService<R, C = SystemClock> {
    repository: Arc<R>,
    clock: C,
    base_url: String,
}

impl<R: Repository> ShortenerService<R> {
    /// Creates a new `ShortenerService` composing links under `base_url`.
    pub fn new(repository: R, base_url: impl Into<String>) -> Self {
        Self::with_clock(repository, base_url, SystemClock)
    }
}

impl<R: Repository, C: Clock> ShortenerService<R, C> {
    /// Creates a new `ShortenerService` reading time from `clock`.
    pub fn with_clock(repository: R, base_url: impl Into<String>, clock: C) -> Self {
        Self {
            repository: Arc::new(repository),
            clock,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Validates that the URL parses and uses the `http` or `https` scheme.
    fn validate_url(raw_url: &str) -> Result<(), ShortenerError> {
        if raw_url.is_empty() {
            return Err(ShortenerError::InvalidInput(
                "URL cannot be empty".to_string(),
            ));
        }

        // `Url::parse` drops these silently; the raw string is stored and
        // served back verbatim as the redirect target.
        if raw_url.chars().any(|c| c.is_ascii_control()) {
            return Err(ShortenerError::InvalidInput(
                "URL contains control characters".to_string(),
            ));
        }
        if raw_url.trim() != raw_url {
            return Err(ShortenerError::InvalidInput(
                "URL has surrounding whitespace".to_string(),
            ));
        }

        let parsed = Url::parse(raw_url)
            .map_err(|e| ShortenerError::InvalidInput(format!("URL is not valid: {e}")))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ShortenerError::InvalidInput(format!(
                "URL scheme must be http or https: {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl<R: Repository, C: Clock> Shortener for ShortenerService<R, C> {
    async fn create(&self, raw_url: &str) -> Result<CreatedLink, ShortenerError> {
        Self::validate_url(raw_url)?;

        let record = ShortLinkRecord::new(raw_url, self.clock.now());
        let short_code = record.short_code.clone();
        let expires_at = record.expires_at_timestamp();

        self.repository.put(record).await.map_err(|e| {
            error!(code = %short_code, error = %e, "failed to store short link");
            ShortenerError::from(e)
        })?;

        debug!(code = %short_code, url = %raw_url, "created short link");

        Ok(CreatedLink {
            short_url: short_code.to_url(&self.base_url),
            short_code,
            expires_at,
        })
    }
}
