use crate::error::Result;
use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use std::fmt::{Display, Formatter};
use tracing::{info, warn};
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};
use typed_builder::TypedBuilder;

pub const DEFAULT_FILTER: &str = "info";
pub const DEFAULT_SERVICE_NAME: &str = "snaplink";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct TelemetryConfig {
    #[builder(default)]
    pub log_format: LogFormat,
    /// Used when `RUST_LOG` is unset.
    #[builder(default = DEFAULT_FILTER.to_string(), setter(into))]
    pub default_filter: String,
    #[builder(default = DEFAULT_SERVICE_NAME.to_string(), setter(into))]
    pub service_name: String,
    /// OTLP gRPC collector. Spans and counters stay local when unset.
    #[builder(default)]
    pub otlp_endpoint: Option<String>,
}

/// Flushes and shuts down the OTLP pipelines when dropped.
#[must_use = "dropping the guard shuts down the exporters"]
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
}

impl TelemetryGuard {
    pub fn otlp_enabled(&self) -> bool {
        self.tracer_provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(e) = provider.shutdown() {
                warn!(error = %e, "failed to shut down tracer provider");
            }
        }
        if let Some(provider) = self.meter_provider.take() {
            if let Err(e) = provider.shutdown() {
                warn!(error = %e, "failed to shut down meter provider");
            }
        }
    }
}

fn env_filter(default_filter: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(default_filter)?),
    }
}

/// Installs the global subscriber and, if an endpoint is configured, the
/// OTLP span and metric exporters. Must be called once, inside the runtime.
pub fn init(config: &TelemetryConfig) -> Result<TelemetryGuard> {
    let filter = env_filter(&config.default_filter)?;

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.log_format {
        LogFormat::Pretty => fmt::layer().with_target(true).boxed(),
        LogFormat::Json => fmt::layer().json().flatten_event(true).boxed(),
    };

    let (otel_layer, tracer_provider, meter_provider) = match &config.otlp_endpoint {
        Some(endpoint) => {
            let resource = Resource::builder()
                .with_service_name(config.service_name.clone())
                .build();

            let spans = SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint.clone())
                .build()?;
            let tracer_provider = SdkTracerProvider::builder()
                .with_batch_exporter(spans)
                .with_resource(resource.clone())
                .build();

            let counters = MetricExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint.clone())
                .build()?;
            let meter_provider = SdkMeterProvider::builder()
                .with_periodic_exporter(counters)
                .with_resource(resource)
                .build();
            global::set_meter_provider(meter_provider.clone());

            let tracer = tracer_provider.tracer(config.service_name.clone());
            (
                Some(tracing_opentelemetry::layer().with_tracer(tracer)),
                Some(tracer_provider),
                Some(meter_provider),
            )
        }
        None => (None, None, None),
    };

    let subscriber = Registry::default()
        .with(fmt_layer)
        .with(filter)
        .with(otel_layer);

    LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        log_format = %config.log_format,
        otlp_endpoint = config.otlp_endpoint.as_deref().unwrap_or("none"),
        "telemetry initialized"
    );

    Ok(TelemetryGuard {
        tracer_provider,
        meter_provider,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TelemetryError;

    #[test]
    fn log_format_display_names() {
        assert_eq!(LogFormat::Pretty.to_string(), "pretty");
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[test]
    fn config_defaults() {
        let config = TelemetryConfig::builder().build();
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.default_filter, DEFAULT_FILTER);
        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn malformed_default_filter_is_rejected() {
        // Only meaningful when RUST_LOG does not override the default.
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(matches!(
                env_filter("snaplink=notalevel"),
                Err(TelemetryError::Filter(_))
            ));
        }
    }

    #[test]
    fn guard_without_otlp_is_inert() {
        let guard = TelemetryGuard {
            tracer_provider: None,
            meter_provider: None,
        };
        assert!(!guard.otlp_enabled());
        drop(guard);
    }
}
