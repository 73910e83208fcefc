//! [`MetricsSink`] implementations backed by the log stream or OpenTelemetry.

use async_trait::async_trait;
use opentelemetry::metrics::{Counter, Meter};
use opentelemetry::{global, KeyValue};
use snaplink_core::metrics::METRICS_NAMESPACE;
use snaplink_core::{Metric, MetricsError, MetricsSink};
use tracing::info;

/// Writes each increment as a structured log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMetricsSink;

#[async_trait]
impl MetricsSink for TracingMetricsSink {
    async fn incr(&self, metric: Metric, value: u64) -> Result<(), MetricsError> {
        info!(
            target: "snaplink::metrics",
            namespace = METRICS_NAMESPACE,
            metric = %metric,
            value,
            "metric emitted"
        );
        Ok(())
    }
}

/// Counts increments on OpenTelemetry `u64` counters.
#[derive(Debug, Clone)]
pub struct OtelMetricsSink {
    urls_accessed: Counter<u64>,
    metrics_accessed: Counter<u64>,
}

impl OtelMetricsSink {
    /// Uses the global meter provider. Without a configured exporter the
    /// counters are no-ops.
    pub fn new() -> Self {
        Self::from_meter(&global::meter(METRICS_NAMESPACE))
    }

    pub fn from_meter(meter: &Meter) -> Self {
        Self {
            urls_accessed: meter
                .u64_counter(Metric::UrlsAccessed.name())
                .with_description("Successful short link redirects")
                .build(),
            metrics_accessed: meter
                .u64_counter(Metric::MetricsAccessed.name())
                .with_description("Usage report requests")
                .build(),
        }
    }

    fn counter(&self, metric: Metric) -> &Counter<u64> {
        match metric {
            Metric::UrlsAccessed => &self.urls_accessed,
            Metric::MetricsAccessed => &self.metrics_accessed,
        }
    }
}

impl Default for OtelMetricsSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsSink for OtelMetricsSink {
    async fn incr(&self, metric: Metric, value: u64) -> Result<(), MetricsError> {
        self.counter(metric)
            .add(value, &[KeyValue::new("namespace", METRICS_NAMESPACE)]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::metrics::MeterProvider as _;
    use opentelemetry_sdk::metrics::SdkMeterProvider;

    #[tokio::test]
    async fn tracing_sink_accepts_every_metric() {
        let sink = TracingMetricsSink;
        sink.incr(Metric::UrlsAccessed, 1).await.unwrap();
        sink.incr(Metric::MetricsAccessed, 3).await.unwrap();
    }

    #[tokio::test]
    async fn otel_sink_counts_on_local_provider() {
        let provider = SdkMeterProvider::builder().build();
        let sink = OtelMetricsSink::from_meter(&provider.meter("snaplink-test"));

        sink.incr(Metric::UrlsAccessed, 1).await.unwrap();
        sink.incr(Metric::MetricsAccessed, 1).await.unwrap();

        provider.shutdown().unwrap();
    }

    #[tokio::test]
    async fn otel_sink_falls_back_to_noop_global_meter() {
        let sink = OtelMetricsSink::default();
        assert!(sink.incr(Metric::UrlsAccessed, 1).await.is_ok());
    }
}
