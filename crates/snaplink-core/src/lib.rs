//! Core types and traits for the Snaplink URL shortener.
//!
//! This crate provides the record model, the short code derivation and the
//! seams (repository, metrics sink, clock) shared by the shortener, the
//! redirector and the reporter.

pub mod clock;
pub mod error;
pub mod metrics;
pub mod record;
pub mod repository;
pub mod shortcode;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use error::{MetricsError, StorageError};
pub use metrics::{Metric, MetricsSink, NoopMetricsSink};
pub use record::{ShortLinkRecord, LINK_TTL};
pub use repository::{ReadRepository, Repository, ScanOutcome, ScanRepository};
pub use shortcode::ShortCode;
