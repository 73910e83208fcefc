use crate::reporter::{Reporter, UsageReport};
use async_trait::async_trait;
use snaplink_core::metrics::{dispatch, DEFAULT_EMIT_TIMEOUT};
use snaplink_core::{Clock, Metric, MetricsSink, ScanRepository, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub struct ReporterService<R, M, C = SystemClock> {
    repository: Arc<R>,
    metrics: Arc<M>,
    clock: C,
    metrics_timeout: Duration,
}

impl<R: ScanRepository, M: MetricsSink> ReporterService<R, M> {
    pub fn new(repository: R, metrics: M) -> Self {
        Self::with_clock(repository, metrics, SystemClock)
    }
}

impl<R: ScanRepository, M: MetricsSink, C: Clock> ReporterService<R, M, C> {
    pub fn with_clock(repository: R, metrics: M, clock: C) -> Self {
        Self {
            repository: Arc::new(repository),
            metrics: Arc::new(metrics),
            clock,
            metrics_timeout: DEFAULT_EMIT_TIMEOUT,
        }
    }

    pub fn with_metrics_timeout(mut self, limit: Duration) -> Self {
        self.metrics_timeout = limit;
        self
    }
}

#[async_trait]
impl<R: ScanRepository, M: MetricsSink, C: Clock> Reporter for ReporterService<R, M, C> {
    async fn report(&self) -> UsageReport {
        let _ = dispatch(
            Arc::clone(&self.metrics),
            Metric::MetricsAccessed,
            self.metrics_timeout,
        );

        let outcome = match self.repository.scan().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "failed to scan records for report");
                return UsageReport::degraded(self.clock.now());
            }
        };

        let report = UsageReport {
            created: outcome.records.len() as u64,
            accessed: outcome
                .records
                .iter()
                .fold(0u64, |sum, r| sum.saturating_add(r.click_count)),
            active: outcome.scanned(),
            degraded: false,
            generated_at: self.clock.now(),
        };

        debug!(
            created = report.created,
            accessed = report.accessed,
            active = report.active,
            "usage report computed"
        );
        report
    }
}
