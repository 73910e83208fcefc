//! Redirect resolution for Snaplink.
//!
//! A [`RedirectorService`] turns a short code into a redirect target. On each
//! hit it bumps the record's click counter (best effort, last writer wins)
//! and emits an `UrlsAccessed` metric on a detached task, so neither side
//! effect can delay or fail the redirect itself.
//!
//! # Example
//!
//! ```rust
//! use snaplink_core::NoopMetricsSink;
//! use snaplink_redirector::{RedirectorService, RedirectorSettings};
//! use snaplink_storage::InMemoryRepository;
//!
//! # async fn example() {
//! let service = RedirectorService::new(
//!     InMemoryRepository::new(),
//!     NoopMetricsSink,
//!     RedirectorSettings::builder().build(),
//! );
//!
//! match service.resolve("a9a9b569").await {
//!     Ok(target) => println!("301 -> {}", target.location),
//!     Err(e) => println!("no redirect: {e}"),
//! }
//! # }
//! ```

pub mod error;
pub mod redirector;
pub mod service;

pub use error::{RedirectorError, Result};
pub use redirector::{RedirectTarget, Redirector};
pub use service::{RedirectorService, RedirectorSettings};
