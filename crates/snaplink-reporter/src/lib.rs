//! Coarse usage counts for the Snaplink dashboard.
//!
//! The report is computed from a full scan of the store on every request.
//! That is fine at small scale; a larger deployment would keep running
//! counters instead.

pub mod reporter;
pub mod service;

pub use reporter::{Reporter, UsageReport};
pub use service::ReporterService;
