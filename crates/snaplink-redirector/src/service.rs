use std::sync::Arc;
use std::time::Duration;

use crate::redirector::{RedirectTarget, Redirector};
use crate::RedirectorError;
use async_trait::async_trait;
use snaplink_core::metrics::{dispatch, DEFAULT_EMIT_TIMEOUT};
use snaplink_core::{
    Clock, Metric, MetricsSink, ReadRepository, Repository, ShortCode, SystemClock,
};
use tracing::{debug, error, trace, warn};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct RedirectorSettings {
    /// Upper bound for a single detached metric emission.
    #[builder(default = DEFAULT_EMIT_TIMEOUT)]
    pub metrics_timeout: Duration,
}

/// Service for handling URL redirects.
///
/// The click counter is updated with a plain read-modify-write: concurrent
/// resolutions of the same code may overwrite each other's increment, so
/// counts are approximate. The original URL and the code are never touched.
#[derive(Debug, Clone)]
pub struct RedirectorService<R, M, C = SystemClock> {
    repository: Arc<R>,
    metrics: Arc<M>,
    clock: C,
    settings: RedirectorSettings,
}

impl<R: Repository, M: MetricsSink> RedirectorService<R, M> {
    /// Creates a new RedirectorService with the given repository and metrics sink.
    pub fn new(repository: R, metrics: M, settings: RedirectorSettings) -> Self {
        Self::with_clock(repository, metrics, settings, SystemClock)
    }
}

impl<R: Repository, M: MetricsSink, C: Clock> RedirectorService<R, M, C> {
    pub fn with_clock(repository: R, metrics: M, settings: RedirectorSettings, clock: C) -> Self {
        Self {
            repository: Arc::new(repository),
            metrics: Arc::new(metrics),
            clock,
            settings,
        }
    }

    /// Resolves a short code to its original URL.
    ///
    /// # Returns
    ///
    /// * `Ok(target)` - The original URL if found and not expired
    /// * `Err(NotFound)` - If the code is malformed, unknown, or expired
    /// * `Err(StorageUnavailable)` - If the record could not be read
    pub async fn resolve(&self, code: &str) -> crate::Result<RedirectTarget> {
        Redirector::resolve(self, code).await
    }
}

#[async_trait]
impl<R: Repository, M: MetricsSink, C: Clock> Redirector for RedirectorService<R, M, C> {
    async fn resolve(&self, code: &str) -> crate::Result<RedirectTarget> {
        trace!(code = %code, "resolving short code");

        // Every stored code is derived, so anything else cannot exist.
        let Some(short_code) = ShortCode::parse(code) else {
            trace!(code = %code, "malformed short code");
            return Err(RedirectorError::NotFound(code.to_owned()));
        };

        let record = self.repository.get(&short_code).await.map_err(|e| {
            error!(code = %short_code, error = %e, "failed to read short link");
            RedirectorError::from(e)
        })?;

        let Some(mut record) = record else {
            trace!(code = %short_code, "short code not found");
            return Err(RedirectorError::NotFound(short_code.to_string()));
        };

        // The store purges expired records lazily, so check again here.
        if record.is_expired_at(self.clock.now()) {
            debug!(code = %short_code, expires_at = record.expires_at, "record has expired");
            return Err(RedirectorError::NotFound(short_code.to_string()));
        }

        let location = record.original_url.clone();

        record.click_count = record.click_count.saturating_add(1);
        let click_count = record.click_count;
        if let Err(e) = self.repository.put(record).await {
            warn!(code = %short_code, error = %e, "failed to update click count");
        }

        // Detached: the redirect never waits for telemetry.
        let _ = dispatch(
            Arc::clone(&self.metrics),
            Metric::UrlsAccessed,
            self.settings.metrics_timeout,
        );

        debug!(code = %short_code, url = %location, click_count, "resolved short code");
        Ok(RedirectTarget { location })
    }
}
