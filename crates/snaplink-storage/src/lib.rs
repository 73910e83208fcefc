//! Repository backends for short link records.
//!
//! - [`InMemoryRepository`]: a `DashMap` store with a lazy expiry sweeper.
//! - [`RedisRepository`]: JSON values with native Redis TTL.
//! - [`TimeoutRepository`]: a decorator bounding every call of another backend.

pub mod error;
pub mod memory;
pub mod redis;
pub mod timeout;

pub use error::StorageError;
pub use memory::InMemoryRepository;
pub use self::redis::RedisRepository;
pub use snaplink_core::repository::{ReadRepository, Repository, ScanOutcome, ScanRepository};
pub use timeout::TimeoutRepository;
