use crate::error::StorageError;
use crate::record::ShortLinkRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record for a given short code.
    ///
    /// Returns `None` if the code does not exist. A record past its expiry
    /// may still be returned when the backend has not purged it yet.
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLinkRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Writes the record keyed by its short code, replacing any existing one.
    ///
    /// This is an unconditional upsert. Backends with native expiry should
    /// schedule removal at `record.expires_at`.
    async fn put(&self, record: ShortLinkRecord) -> Result<()>;
}

/// Everything a full scan saw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    /// Records that decoded successfully.
    pub records: Vec<ShortLinkRecord>,
    /// Items present in the store that could not be decoded as records.
    pub undecodable: u64,
}

impl ScanOutcome {
    /// Total number of items seen, decodable or not.
    pub fn scanned(&self) -> u64 {
        self.records.len() as u64 + self.undecodable
    }
}

/// Full-table reads for reporting.
///
/// Scans are not isolated from concurrent writes and include records that
/// are expired but not yet purged.
#[async_trait]
pub trait ScanRepository: Send + Sync + 'static {
    async fn scan(&self) -> Result<ScanOutcome>;
}

#[async_trait]
impl<R: ReadRepository + ?Sized> ReadRepository for std::sync::Arc<R> {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLinkRecord>> {
        (**self).get(code).await
    }
}

#[async_trait]
impl<R: Repository + ?Sized> Repository for std::sync::Arc<R> {
    async fn put(&self, record: ShortLinkRecord) -> Result<()> {
        (**self).put(record).await
    }
}

#[async_trait]
impl<R: ScanRepository + ?Sized> ScanRepository for std::sync::Arc<R> {
    async fn scan(&self) -> Result<ScanOutcome> {
        (**self).scan().await
    }
}
