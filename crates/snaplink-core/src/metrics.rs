use crate::error::MetricsError;
use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

/// Namespace every metric is published under.
pub const METRICS_NAMESPACE: &str = "snaplink";

/// Default bound for a single emission.
pub const DEFAULT_EMIT_TIMEOUT: Duration = Duration::from_secs(1);

/// Counters published by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// A short code was resolved to a redirect.
    UrlsAccessed,
    /// The usage report was requested.
    MetricsAccessed,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::UrlsAccessed => "UrlsAccessed",
            Metric::MetricsAccessed => "MetricsAccessed",
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A sink accepting counter increments.
///
/// Callers treat emission as fire-and-forget: errors are logged and dropped,
/// never surfaced to the request that triggered them.
#[async_trait]
pub trait MetricsSink: Send + Sync + 'static {
    /// Adds `value` to the counter for `metric`.
    async fn incr(&self, metric: Metric, value: u64) -> Result<(), MetricsError>;
}

#[async_trait]
impl<M: MetricsSink + ?Sized> MetricsSink for std::sync::Arc<M> {
    async fn incr(&self, metric: Metric, value: u64) -> Result<(), MetricsError> {
        (**self).incr(metric, value).await
    }
}

/// Emits a single increment of `metric` on a detached task.
///
/// The caller is not expected to await the returned handle. The emission is
/// bounded by `limit`; failures and timeouts are logged and dropped.
pub fn dispatch<M: MetricsSink + ?Sized>(
    sink: Arc<M>,
    metric: Metric,
    limit: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = match tokio::time::timeout(limit, sink.incr(metric, 1)).await {
            Ok(result) => result,
            Err(_) => Err(MetricsError::Timeout(limit)),
        };

        match outcome {
            Ok(()) => trace!(metric = %metric, "metric emitted"),
            Err(e) => warn!(metric = %metric, error = %e, "dropping metric"),
        }
    })
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetricsSink;

#[async_trait]
impl MetricsSink for NoopMetricsSink {
    async fn incr(&self, _metric: Metric, _value: u64) -> Result<(), MetricsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    struct CountingSink {
        accessed: AtomicU64,
    }

    #[async_trait]
    impl MetricsSink for CountingSink {
        async fn incr(&self, metric: Metric, value: u64) -> Result<(), MetricsError> {
            assert_eq!(metric, Metric::UrlsAccessed);
            self.accessed.fetch_add(value, Ordering::SeqCst);
            Ok(())
        }
    }

    struct StalledSink;

    #[async_trait]
    impl MetricsSink for StalledSink {
        async fn incr(&self, _metric: Metric, _value: u64) -> Result<(), MetricsError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    struct BrokenSink;

    #[async_trait]
    impl MetricsSink for BrokenSink {
        async fn incr(&self, _metric: Metric, _value: u64) -> Result<(), MetricsError> {
            Err(MetricsError::Unavailable("sink offline".into()))
        }
    }

    #[test]
    fn metric_names() {
        assert_eq!(Metric::UrlsAccessed.to_string(), "UrlsAccessed");
        assert_eq!(Metric::MetricsAccessed.name(), "MetricsAccessed");
    }

    #[tokio::test]
    async fn dispatch_emits_once() {
        let sink = Arc::new(CountingSink::default());

        dispatch(sink.clone(), Metric::UrlsAccessed, DEFAULT_EMIT_TIMEOUT)
            .await
            .unwrap();

        assert_eq!(sink.accessed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_gives_up_on_stalled_sink() {
        let handle = dispatch(
            Arc::new(StalledSink),
            Metric::UrlsAccessed,
            Duration::from_millis(10),
        );

        // The task finishes (and does not panic) once the bound elapses.
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn dispatch_swallows_sink_errors() {
        let handle = dispatch(
            Arc::new(BrokenSink),
            Metric::MetricsAccessed,
            DEFAULT_EMIT_TIMEOUT,
        );
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn dispatch_accepts_trait_objects() {
        let sink: Arc<dyn MetricsSink> = Arc::new(NoopMetricsSink);
        dispatch(sink, Metric::UrlsAccessed, DEFAULT_EMIT_TIMEOUT)
            .await
            .unwrap();
    }
}
