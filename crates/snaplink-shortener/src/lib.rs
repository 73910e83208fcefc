//! Code assignment for Snaplink.
//!
//! Validates a long URL, derives its short code and upserts the record with
//! a fresh one-week expiry.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use service::ShortenerService;
pub use shortener::{CreatedLink, Shortener};
