use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snaplink_reporter::UsageReport;

/// RFC 3339 at second precision, always UTC (`2024-01-15T10:00:00Z`).
pub fn rfc3339(ts: Timestamp) -> String {
    ts.strftime("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

impl CreateUrlRequest {
    /// Parses a request body. Only a JSON object is accepted; unknown keys
    /// are ignored.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        let object: Map<String, Value> = serde_json::from_slice(body)?;
        serde_json::from_value(Value::Object(object))
    }
}

#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub short_url: String,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub urls_created: u64,
    pub urls_accessed: u64,
    pub unique_visitors: u64,
    pub active_urls: u64,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl From<UsageReport> for MetricsResponse {
    fn from(report: UsageReport) -> Self {
        Self {
            urls_created: report.created,
            urls_accessed: report.accessed,
            // No visitor identity is tracked; this mirrors `urls_accessed`.
            unique_visitors: report.accessed,
            active_urls: report.active,
            timestamp: rfc3339(report.generated_at),
            error: report.degraded.then_some("Failed to fetch metrics"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
