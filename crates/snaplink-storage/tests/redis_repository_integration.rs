use jiff::{SignedDuration, Timestamp};
use redis::AsyncCommands;
use snaplink_core::{ShortCode, ShortLinkRecord};
use snaplink_storage::{ReadRepository, RedisRepository, Repository, ScanRepository, StorageError};
use snaplink_test_infra::redis::{RedisConfig, RedisServer};

const PREFIX: &str = "test:links:";

struct Fixture {
    server: RedisServer,
    repo: RedisRepository,
}

impl Fixture {
    async fn start() -> Self {
        let server = RedisServer::start(RedisConfig::builder().build())
            .await
            .expect("start redis");
        let conn = server.connection().await.expect("redis connection");

        Self {
            server,
            repo: RedisRepository::with_prefix(conn, PREFIX),
        }
    }

    async fn raw_connection(&self) -> redis::aio::MultiplexedConnection {
        self.server.connection().await.expect("redis connection")
    }
}

fn fresh(url: &str) -> ShortLinkRecord {
    ShortLinkRecord::new(url, Timestamp::now())
}

#[tokio::test]
async fn put_and_get_round_trips_all_fields() {
    let fixture = Fixture::start().await;
    let mut record = fresh("https://example.com/path?q=1");
    record.click_count = 17;

    fixture.repo.put(record.clone()).await.unwrap();

    let got = fixture.repo.get(&record.short_code).await.unwrap().unwrap();
    assert_eq!(got, record);
}

#[tokio::test]
async fn get_unknown_code_is_none() {
    let fixture = Fixture::start().await;

    let got = fixture
        .repo
        .get(&ShortCode::derive("https://nowhere.example"))
        .await
        .unwrap();
    assert!(got.is_none());
}

#[tokio::test]
async fn put_overwrites_existing_record() {
    let fixture = Fixture::start().await;
    let mut first = fresh("https://example.com");
    first.click_count = 5;
    fixture.repo.put(first.clone()).await.unwrap();

    let second = fresh("https://example.com");
    fixture.repo.put(second).await.unwrap();

    let got = fixture.repo.get(&first.short_code).await.unwrap().unwrap();
    assert_eq!(got.click_count, 0);
}

#[tokio::test]
async fn put_sets_native_expiry() {
    let fixture = Fixture::start().await;
    let record = fresh("https://example.com");
    fixture.repo.put(record.clone()).await.unwrap();

    let mut conn = fixture.raw_connection().await;
    let key = format!("{}{}", PREFIX, record.short_code);
    let expire_at: i64 = redis::cmd("EXPIRETIME")
        .arg(&key)
        .query_async(&mut conn)
        .await
        .unwrap();

    assert_eq!(expire_at, record.expires_at);
}

#[tokio::test]
async fn past_due_record_is_dropped_by_redis() {
    let fixture = Fixture::start().await;
    let mut record = fresh("https://example.com");
    record.expires_at = (Timestamp::now() - SignedDuration::from_secs(10)).as_second();

    fixture.repo.put(record.clone()).await.unwrap();

    let stored = fixture.repo.get(&record.short_code).await.unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn undecodable_value_is_invalid_data() {
    let fixture = Fixture::start().await;
    let code = ShortCode::derive("https://garbage.example");

    let mut conn = fixture.raw_connection().await;
    conn.set::<_, _, ()>(format!("{}{}", PREFIX, code), "not json")
        .await
        .unwrap();

    let err = fixture.repo.get(&code).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidData(_)));
}

#[tokio::test]
async fn scan_counts_records_and_garbage_under_prefix_only() {
    let fixture = Fixture::start().await;

    assert_eq!(fixture.repo.scan().await.unwrap().scanned(), 0);

    for i in 0..25 {
        let mut record = fresh(&format!("https://example{}.com", i));
        record.click_count = i;
        fixture.repo.put(record).await.unwrap();
    }

    let mut conn = fixture.raw_connection().await;
    conn.set::<_, _, ()>(format!("{}deadbeef", PREFIX), "{}")
        .await
        .unwrap();
    conn.set::<_, _, ()>("other:links:deadbeef", "{}")
        .await
        .unwrap();

    let outcome = fixture.repo.scan().await.unwrap();
    assert_eq!(outcome.records.len(), 25);
    assert_eq!(outcome.undecodable, 1);
    assert_eq!(outcome.scanned(), 26);

    let clicks: u64 = outcome.records.iter().map(|r| r.click_count).sum();
    assert_eq!(clicks, (0..25).sum::<u64>());
}
