//! Process-wide tracing setup and metric sinks.

pub mod error;
pub mod metrics;
pub mod subscriber;

pub use error::TelemetryError;
pub use metrics::{OtelMetricsSink, TracingMetricsSink};
pub use subscriber::{init, LogFormat, TelemetryConfig, TelemetryGuard};
