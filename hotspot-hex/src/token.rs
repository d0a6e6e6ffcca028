//! Session token minting and verification.
//!
//! A token is `base64(HMAC-SHA256(secret, timestamp || device))` where
//! `timestamp` is the decimal ASCII form of the Unix seconds and `device` is
//! appended with no separator. Any other implementation must reproduce
//! this exact byte layout to interoperate.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use hotspot_types::{SecretKey, SessionToken, TokenWindow};

type HmacSha256 = Hmac<Sha256>;

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// The timestamp lies outside the validity window.
    Expired,
    /// The token does not match `(device, timestamp)` under our secret.
    Mismatch,
}

/// Derives and checks stateless session tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: SecretKey,
}

impl TokenService {
    pub fn new(secret: SecretKey) -> Self {
        Self { secret }
    }

    /// Mints the token for `(device_id, timestamp)`.
    pub fn generate(&self, device_id: &str, timestamp: i64) -> SessionToken {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(device_id.as_bytes());
        SessionToken::new(BASE64.encode(mac.finalize().into_bytes()))
    }

    /// Checks the window first, then the digest (constant-time).
    pub fn check(
        &self,
        device_id: &str,
        timestamp: i64,
        candidate: &str,
        window: TokenWindow,
        now: i64,
    ) -> Result<(), TokenRejection> {
        if !window.admits(now, timestamp) {
            return Err(TokenRejection::Expired);
        }

        let expected = self.generate(device_id, timestamp);
        if expected.as_str().as_bytes().ct_eq(candidate.as_bytes()).into() {
            Ok(())
        } else {
            Err(TokenRejection::Mismatch)
        }
    }

    /// Returns true only for an untampered token inside its window.
    pub fn verify(
        &self,
        device_id: &str,
        timestamp: i64,
        candidate: &str,
        window: TokenWindow,
        now: i64,
    ) -> bool {
        self.check(device_id, timestamp, candidate, window, now)
            .is_ok()
    }
}
