use crate::error::{map_redis_error, Result, StorageError};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use snaplink_core::{
    ReadRepository, Repository, ScanOutcome, ScanRepository, ShortCode, ShortLinkRecord,
};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// Key prefix used when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "snaplink:links:";

/// Number of keys requested per `SCAN` round trip.
const SCAN_BATCH: usize = 500;

/// A Redis-backed repository.
///
/// Records are stored as JSON strings under `<key_prefix><short_code>` and
/// carry a native expiry (`SET ... EXAT expires_at`), so Redis removes them
/// on its own once they are past due.
#[derive(Debug, Clone)]
pub struct RedisRepository {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisRepository {
    /// Creates a repository over an existing multiplexed connection.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self::with_prefix(conn, DEFAULT_KEY_PREFIX)
    }

    /// Creates a repository with a custom key prefix (e.g. `"myapp:links:"`).
    ///
    /// The prefix plays the role of a table name: every key the repository
    /// reads, writes or scans lives under it.
    pub fn with_prefix(conn: MultiplexedConnection, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a new multiplexed connection to `redis_url`.
    pub async fn connect(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(map_redis_error)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(map_redis_error)?;
        Ok(Self::with_prefix(conn, key_prefix))
    }

    fn key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.key_prefix, code.as_str())
    }
}

fn decode(key: &str, raw: &str) -> Result<ShortLinkRecord> {
    serde_json::from_str(raw)
        .map_err(|e| StorageError::InvalidData(format!("record at '{}' is not valid: {e}", key)))
}

#[async_trait]
impl ReadRepository for RedisRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLinkRecord>> {
        let key = self.key(code);
        trace!(code = %code, "fetching record from Redis");

        let mut conn = self.conn.clone();
        let raw = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(map_redis_error)?;

        match raw {
            Some(raw) => decode(&key, &raw).map(Some),
            None => {
                trace!(code = %code, "record not found in Redis");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl Repository for RedisRepository {
    async fn put(&self, record: ShortLinkRecord) -> Result<()> {
        let key = self.key(&record.short_code);
        let json = serde_json::to_string(&record)
            .map_err(|e| StorageError::InvalidData(format!("failed to encode record: {e}")))?;

        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(&key)
            .arg(json)
            .arg("EXAT")
            .arg(record.expires_at)
            .query_async::<()>(&mut conn)
            .await
            .map_err(map_redis_error)?;

        debug!(code = %record.short_code, expires_at = record.expires_at, "stored record in Redis");
        Ok(())
    }
}

#[async_trait]
impl ScanRepository for RedisRepository {
    async fn scan(&self) -> Result<ScanOutcome> {
        let pattern = format!("{}*", self.key_prefix);
        let mut conn = self.conn.clone();
        let mut seen = HashSet::new();
        let mut outcome = ScanOutcome::default();
        let mut cursor: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(map_redis_error)?;

            // SCAN may hand out the same key more than once.
            let keys: Vec<String> = keys
                .into_iter()
                .filter(|k| seen.insert(k.clone()))
                .collect();

            if !keys.is_empty() {
                let values: Vec<Option<String>> = redis::cmd("MGET")
                    .arg(&keys)
                    .query_async(&mut conn)
                    .await
                    .map_err(map_redis_error)?;

                // A `None` value expired between SCAN and MGET.
                for (key, raw) in keys.iter().zip(values) {
                    let Some(raw) = raw else { continue };
                    match decode(key, &raw) {
                        Ok(record) => outcome.records.push(record),
                        Err(e) => {
                            warn!(key = %key, error = %e, "skipping undecodable record");
                            outcome.undecodable += 1;
                        }
                    }
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(scanned = outcome.scanned(), "scanned Redis keyspace");
        Ok(outcome)
    }
}

// Tests requiring a running Redis live in tests/redis_repository_integration.rs.
