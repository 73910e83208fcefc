use async_trait::async_trait;
use jiff::Timestamp;

/// Usage counts derived from one scan of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageReport {
    /// Records that decoded during the scan.
    pub created: u64,
    /// Sum of `click_count` over those records.
    pub accessed: u64,
    /// Every item the scan saw, including undecodable ones.
    pub active: u64,
    /// Set when the scan failed and the counts are zeroed placeholders.
    pub degraded: bool,
    /// When the report was produced.
    pub generated_at: Timestamp,
}

impl UsageReport {
    pub fn empty(generated_at: Timestamp) -> Self {
        Self {
            created: 0,
            accessed: 0,
            active: 0,
            degraded: false,
            generated_at,
        }
    }

    pub fn degraded(generated_at: Timestamp) -> Self {
        Self {
            degraded: true,
            ..Self::empty(generated_at)
        }
    }
}

#[async_trait]
pub trait Reporter: Send + Sync + 'static {
    /// Produces the current usage report. Never fails: a broken scan yields a
    /// degraded, zeroed report.
    async fn report(&self) -> UsageReport;
}
