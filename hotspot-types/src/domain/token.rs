//! Session token value and validity windows.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Keyed digest of `timestamp || device`, base64 encoded.
///
/// Tokens are never stored; validity is always recomputed from the device
/// identifier, the timestamp and the shared secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accepted distance between a token's timestamp and "now", in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenWindow {
    /// `|now - issued_at| <= secs`: tolerates clock skew in both directions.
    Symmetric(u64),
    /// `now - issued_at <= secs`: only the token's age is bounded.
    MaxAge(u64),
}

impl TokenWindow {
    pub fn admits(&self, now: i64, issued_at: i64) -> bool {
        let delta = i128::from(now) - i128::from(issued_at);
        match *self {
            TokenWindow::Symmetric(secs) => delta.abs() <= i128::from(secs),
            TokenWindow::MaxAge(secs) => delta <= i128::from(secs),
        }
    }
}

/// Parses a Unix timestamp in seconds from a query parameter.
///
/// Zero, negative and non-numeric values are rejected.
pub fn parse_timestamp(raw: &str) -> Result<i64, DomainError> {
    match raw.trim().parse::<i64>() {
        Ok(ts) if ts > 0 => Ok(ts),
        _ => Err(DomainError::InvalidTimestamp(raw.to_string())),
    }
}
