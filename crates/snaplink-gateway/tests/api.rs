use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use jiff::{SignedDuration, Timestamp};
use serde_json::{json, Value};
use snaplink_core::{
    ManualClock, NoopMetricsSink, ReadRepository, Repository, ScanOutcome, ScanRepository,
    ShortCode, ShortLinkRecord, StorageError,
};
use snaplink_gateway::{App, AppState};
use snaplink_redirector::{RedirectorService, RedirectorSettings};
use snaplink_reporter::ReporterService;
use snaplink_shortener::ShortenerService;
use snaplink_storage::InMemoryRepository;
use std::sync::Arc;
use tower::ServiceExt;

const BASE_URL: &str = "https://sl.test";
const START: i64 = 1_700_000_000;

struct Fixture {
    router: Router,
    clock: ManualClock,
}

fn router_over<R>(repository: R, clock: ManualClock) -> Router
where
    R: Repository + ScanRepository,
{
    let repository = Arc::new(repository);
    let shortener = ShortenerService::with_clock(Arc::clone(&repository), BASE_URL, clock.clone());
    let redirector = RedirectorService::with_clock(
        Arc::clone(&repository),
        NoopMetricsSink,
        RedirectorSettings::builder().build(),
        clock.clone(),
    );
    let reporter = ReporterService::with_clock(repository, NoopMetricsSink, clock);

    App::router(AppState::new(
        Arc::new(shortener),
        Arc::new(redirector),
        Arc::new(reporter),
    ))
}

fn fixture() -> Fixture {
    let clock = ManualClock::new(Timestamp::from_second(START).unwrap());
    Fixture {
        router: router_over(InMemoryRepository::new(), clock.clone()),
        clock,
    }
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

fn create_request(body: &str) -> Request<Body> {
    Request::post("/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("application/json"),
        "unexpected content type {content_type:?}"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let fx = fixture();
    let response = send(&fx.router, get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn create_returns_short_url_and_expiry() {
    let fx = fixture();
    let response = send(&fx.router, create_request(r#"{"url":"https://foo.com"}"#)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "short_url": "https://sl.test/s/a9a9b569",
            "expires_at": "2023-11-21T22:13:20Z",
        })
    );
}

#[tokio::test]
async fn create_accepts_body_without_content_type() {
    let fx = fixture();
    let request = Request::post("/create")
        .body(Body::from(r#"{"url":"https://bar.com"}"#))
        .unwrap();
    let response = send(&fx.router, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["short_url"],
        "https://sl.test/s/23d97719"
    );
}

#[tokio::test]
async fn create_then_redirect_is_permanent() {
    let fx = fixture();
    let body = r#"{"url":"https://foo.com/a?b=c"}"#;
    send(&fx.router, create_request(body)).await;
    let code = ShortCode::derive("https://foo.com/a?b=c");

    let response = send(&fx.router, get(&format!("/s/{code}"))).await;

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://foo.com/a?b=c"
    );
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let fx = fixture();
    for body in [
        "not json",
        "",
        r#"{"url": 42}"#,
        r#"["https://foo.com"]"#,
        "[]",
    ] {
        let response = send(&fx.router, create_request(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid JSON in request body" })
        );
    }
}

#[tokio::test]
async fn missing_or_empty_url_is_rejected() {
    let fx = fixture();
    for body in ["{}", r#"{"url":""}"#, r#"{"url":null}"#] {
        let response = send(&fx.router, create_request(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(
            json_body(response).await,
            json!({ "error": "URL parameter is required" })
        );
    }
}

#[tokio::test]
async fn non_http_urls_are_rejected() {
    let fx = fixture();
    for url in ["ftp://example.com", "not a url", "javascript:alert(1)"] {
        let body = json!({ "url": url }).to_string();
        let response = send(&fx.router, create_request(&body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "url {url:?}");
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid URL: only http and https allowed" })
        );
    }
}

#[tokio::test]
async fn urls_with_control_characters_or_padding_are_rejected() {
    let fx = fixture();
    for url in [
        "https://foo.com/a\nb",
        "https://foo.com/a\tb",
        " https://foo.com",
    ] {
        let body = json!({ "url": url }).to_string();
        let response = send(&fx.router, create_request(&body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "url {url:?}");
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid URL: only http and https allowed" })
        );

        let code = ShortCode::derive(url);
        let response = send(&fx.router, get(&format!("/s/{code}"))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "url {url:?}");
    }
}

#[tokio::test]
async fn stored_url_unfit_for_location_is_an_internal_error() {
    let now = Timestamp::from_second(START).unwrap();
    let repository = InMemoryRepository::new();
    let record = ShortLinkRecord::new("https://foo.com/a\nb", now);
    let code = record.short_code.clone();
    repository.put(record).await.unwrap();
    let router = router_over(repository, ManualClock::new(now));

    let response = send(&router, get(&format!("/s/{code}"))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Internal server error" })
    );
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let fx = fixture();
    for uri in ["/s/deadbeef", "/s/not-a-code"] {
        let response = send(&fx.router, get(uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {uri:?}");
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Short URL not found" })
        );
    }
}

#[tokio::test]
async fn expired_link_is_not_found() {
    let fx = fixture();
    send(&fx.router, create_request(r#"{"url":"https://foo.com"}"#)).await;
    fx.clock.advance(SignedDuration::from_hours(7 * 24 + 1));

    let response = send(&fx.router, get("/s/a9a9b569")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_reflect_creates_and_redirects() {
    let fx = fixture();
    send(&fx.router, create_request(r#"{"url":"https://foo.com"}"#)).await;
    send(&fx.router, create_request(r#"{"url":"https://bar.com"}"#)).await;
    send(&fx.router, get("/s/a9a9b569")).await;
    send(&fx.router, get("/s/a9a9b569")).await;

    let response = send(&fx.router, get("/metrics")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "urls_created": 2,
            "urls_accessed": 2,
            "unique_visitors": 2,
            "active_urls": 2,
            "timestamp": "2023-11-14T22:13:20Z",
        })
    );
}

#[tokio::test]
async fn unknown_routes_and_methods_are_not_found() {
    let fx = fixture();
    for request in [get("/nope"), get("/create"), get("/s/a9a9b569/extra")] {
        let response = send(&fx.router, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await, json!({ "error": "Not found" }));
    }
}

struct DownRepository;

#[async_trait]
impl ReadRepository for DownRepository {
    async fn get(&self, _code: &ShortCode) -> Result<Option<ShortLinkRecord>, StorageError> {
        Err(StorageError::Unavailable("connection refused".into()))
    }
}

#[async_trait]
impl Repository for DownRepository {
    async fn put(&self, _record: ShortLinkRecord) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("connection refused".into()))
    }
}

#[async_trait]
impl ScanRepository for DownRepository {
    async fn scan(&self) -> Result<ScanOutcome, StorageError> {
        Err(StorageError::Unavailable("connection refused".into()))
    }
}

fn down_router() -> Router {
    router_over(
        DownRepository,
        ManualClock::new(Timestamp::from_second(START).unwrap()),
    )
}

#[tokio::test]
async fn storage_failure_is_an_opaque_500() {
    let router = down_router();

    let created = send(&router, create_request(r#"{"url":"https://foo.com"}"#)).await;
    assert_eq!(created.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(created).await,
        json!({ "error": "Internal server error" })
    );

    let redirected = send(&router, get("/s/a9a9b569")).await;
    assert_eq!(redirected.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn metrics_degrade_when_scan_fails() {
    let router = down_router();
    let response = send(&router, get("/metrics")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "urls_created": 0,
            "urls_accessed": 0,
            "unique_visitors": 0,
            "active_urls": 0,
            "timestamp": "2023-11-14T22:13:20Z",
            "error": "Failed to fetch metrics",
        })
    );
}
