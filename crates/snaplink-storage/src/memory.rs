use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use snaplink_core::{
    Clock, ReadRepository, Repository, ScanOutcome, ScanRepository, ShortCode, ShortLinkRecord,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// In-memory implementation of the repository traits using DashMap.
///
/// Expired records are not hidden on read: like a store with a background
/// TTL reaper they stay visible until [`purge_expired`] runs, either called
/// directly or from the task started by [`spawn_purger`].
///
/// [`purge_expired`]: InMemoryRepository::purge_expired
/// [`spawn_purger`]: InMemoryRepository::spawn_purger
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<DashMap<String, ShortLinkRecord>>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held, expired or not.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Removes every record whose expiry has passed at `now`.
    ///
    /// Returns the number of records removed.
    pub fn purge_expired(&self, now: Timestamp) -> usize {
        let before = self.storage.len();
        self.storage.retain(|_, record| !record.is_expired_at(now));
        before.saturating_sub(self.storage.len())
    }

    /// Starts a background task purging expired records every `interval`.
    ///
    /// The task runs until the returned handle is aborted or the runtime
    /// shuts down.
    pub fn spawn_purger<C: Clock>(&self, clock: C, interval: Duration) -> JoinHandle<()> {
        let repo = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let purged = repo.purge_expired(clock.now());
                if purged > 0 {
                    debug!(purged, "purged expired records");
                }
            }
        })
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLinkRecord>> {
        trace!(code = %code, "reading record from memory");
        Ok(self.storage.get(code.as_str()).map(|entry| entry.clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn put(&self, record: ShortLinkRecord) -> Result<()> {
        trace!(code = %record.short_code, "writing record to memory");
        self.storage
            .insert(record.short_code.as_str().to_owned(), record);
        Ok(())
    }
}

#[async_trait]
impl ScanRepository for InMemoryRepository {
    async fn scan(&self) -> Result<ScanOutcome> {
        let records = self
            .storage
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        Ok(ScanOutcome {
            records,
            undecodable: 0,
        })
    }
}
