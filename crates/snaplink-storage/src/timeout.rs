use crate::error::{Result, StorageError};
use async_trait::async_trait;
use snaplink_core::{
    ReadRepository, Repository, ScanOutcome, ScanRepository, ShortCode, ShortLinkRecord,
};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Default bound for a single store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// A repository decorator that bounds every call of the inner repository.
///
/// A call that does not finish within the limit is abandoned and reported as
/// [`StorageError::Timeout`], so a slow store cannot stall the caller.
#[derive(Debug, Clone)]
pub struct TimeoutRepository<R> {
    inner: R,
    limit: Duration,
}

impl<R> TimeoutRepository<R> {
    pub fn new(inner: R, limit: Duration) -> Self {
        Self { inner, limit }
    }

    /// Returns a reference to the inner repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    op,
                    limit_ms = self.limit.as_millis() as u64,
                    "store call timed out"
                );
                Err(StorageError::Timeout(format!(
                    "{} did not complete within {:?}",
                    op, self.limit
                )))
            }
        }
    }
}

#[async_trait]
impl<R: ReadRepository> ReadRepository for TimeoutRepository<R> {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLinkRecord>> {
        self.bounded("get", self.inner.get(code)).await
    }
}

#[async_trait]
impl<R: Repository> Repository for TimeoutRepository<R> {
    async fn put(&self, record: ShortLinkRecord) -> Result<()> {
        self.bounded("put", self.inner.put(record)).await
    }
}

#[async_trait]
impl<R: ScanRepository> ScanRepository for TimeoutRepository<R> {
    async fn scan(&self) -> Result<ScanOutcome> {
        self.bounded("scan", self.inner.scan()).await
    }
}
