pub use snaplink_core::error::StorageError;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

pub(crate) fn map_redis_error(err: redis::RedisError) -> StorageError {
    let message = err.to_string();

    if err.is_timeout() {
        StorageError::Timeout(message)
    } else if err.is_connection_dropped() || err.is_connection_refusal() || err.is_io_error() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Query(message)
    }
}
