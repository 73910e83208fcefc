use crate::Result;
use async_trait::async_trait;

/// Where a resolved short code sends the caller. Always a permanent redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub location: String,
}

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to its redirect target.
    /// Fails with `NotFound` if the code does not exist or has expired.
    async fn resolve(&self, code: &str) -> Result<RedirectTarget>;
}
