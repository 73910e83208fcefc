use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Display;

/// Number of hex characters kept from the SHA-256 digest.
pub const CODE_LENGTH: usize = 8;

/// A short code identifying a shortened URL.
///
/// Codes are the first [`CODE_LENGTH`] lower-case hex characters of the
/// SHA-256 digest of the raw URL string, so the same URL always maps to the
/// same code.
///
/// Truncating to 32 bits of digest means two distinct URLs can share a code.
/// No collision detection is performed: the later write silently replaces the
/// earlier record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Derives the short code for a raw, unnormalized URL.
    pub fn derive(raw_url: &str) -> Self {
        let digest = Sha256::digest(raw_url.as_bytes());
        let hex = format!("{:x}", digest);
        Self(hex[..CODE_LENGTH].to_owned())
    }

    /// Parses an externally supplied code.
    ///
    /// Returns `None` unless the input is exactly [`CODE_LENGTH`] lower-case
    /// hex characters.
    pub fn parse(code: &str) -> Option<Self> {
        let well_formed = code.len() == CODE_LENGTH
            && code
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));

        well_formed.then(|| Self(code.to_owned()))
    }

    /// Composes the public short URL, e.g. `https://sl.example/s/a9a9b569`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/s/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("malformed short code: '{}'", value))
    }
}

impl From<ShortCode> for String {
    fn from(code: ShortCode) -> Self {
        code.0
    }
}
