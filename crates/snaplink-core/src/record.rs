use crate::shortcode::ShortCode;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// How long a link stays resolvable after it was (re)created.
pub const LINK_TTL: SignedDuration = SignedDuration::from_hours(7 * 24);

/// A stored short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLinkRecord {
    /// The key of the record, derived from `original_url`.
    pub short_code: ShortCode,
    /// The URL to redirect to.
    pub original_url: String,
    /// When the record was created. Informational only.
    pub created_at: Timestamp,
    /// Absolute expiry in epoch seconds.
    pub expires_at: i64,
    /// Approximate number of redirects served.
    #[serde(default)]
    pub click_count: u64,
}

impl ShortLinkRecord {
    /// Builds a fresh record for `original_url`, expiring [`LINK_TTL`] after `now`.
    pub fn new(original_url: impl Into<String>, now: Timestamp) -> Self {
        let original_url = original_url.into();
        Self {
            short_code: ShortCode::derive(&original_url),
            original_url,
            created_at: now,
            expires_at: (now + LINK_TTL).as_second(),
            click_count: 0,
        }
    }

    /// A record is expired strictly after its `expires_at` second.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.as_second() > self.expires_at
    }

    /// Returns `expires_at` as a timestamp, falling back to the maximum
    /// representable instant when the stored value is out of range.
    pub fn expires_at_timestamp(&self) -> Timestamp {
        Timestamp::from_second(self.expires_at).unwrap_or(Timestamp::MAX)
    }
}
