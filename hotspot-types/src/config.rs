//! Immutable portal configuration.
//!
//! Built once at startup and injected into every component; nothing reads
//! the environment after that.

use crate::domain::{Money, PaymentMethod, TokenWindow, VatRate};

/// Shared secret used to key session tokens. Never printed.
#[derive(Clone)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Default list of payment methods the portal accepts.
pub const DEFAULT_ALLOWED_METHODS: &[&str] = &[
    "gopay",
    "shopeepay",
    "other_qris",
    "echannel",
    "bri_va",
    "cimb_va",
    "bni_va",
    "permata_va",
    "other_va",
];

/// Portal settings shared (read-only) by all requests.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub secret: SecretKey,
    /// Accepted skew for a freshly requested pre-auth token.
    pub preauth_window_secs: u64,
    /// Lifetime of payment-initiation and session tokens.
    pub session_validity_secs: u64,
    /// Destination used when a request carries no `dst`; also the target of
    /// the soft-expiry redirect and the allowed CORS origin.
    pub default_destination: String,
    pub default_method: PaymentMethod,
    pub base_price: Money,
    pub vat: VatRate,
    pub allowed_methods: Vec<PaymentMethod>,
    /// Verification endpoint the gateway sends the browser back to.
    pub callback_url: String,
    /// Captive-portal login page that performs the final access grant.
    pub login_redirect_base: String,
    /// Prefix of the hotspot username synthesized from the device id.
    pub username_prefix: String,
    /// Accept a `transaction_status` carried on the callback URL instead of
    /// always asking the gateway.
    pub trust_callback_status: bool,
}

impl PortalConfig {
    /// Creates a configuration with the stock pricing and windows.
    pub fn new(
        secret: SecretKey,
        default_destination: impl Into<String>,
        callback_url: impl Into<String>,
        login_redirect_base: impl Into<String>,
    ) -> Self {
        Self {
            secret,
            preauth_window_secs: 10,
            session_validity_secs: 60,
            default_destination: default_destination.into(),
            default_method: PaymentMethod::OtherQris,
            base_price: Money::new(3000).unwrap_or(Money::ZERO),
            vat: VatRate::from_basis_points(1100),
            allowed_methods: DEFAULT_ALLOWED_METHODS
                .iter()
                .filter_map(|code| code.parse().ok())
                .collect(),
            callback_url: callback_url.into(),
            login_redirect_base: login_redirect_base.into(),
            username_prefix: "T-".to_string(),
            trust_callback_status: true,
        }
    }

    pub fn is_method_allowed(&self, method: &PaymentMethod) -> bool {
        self.allowed_methods.contains(method)
    }

    /// Window for a token presented to the pre-auth check.
    pub fn preauth_window(&self) -> TokenWindow {
        TokenWindow::Symmetric(self.preauth_window_secs)
    }

    /// Window for a token presented at payment initiation: age only.
    pub fn initiation_window(&self) -> TokenWindow {
        TokenWindow::MaxAge(self.session_validity_secs)
    }

    /// Window for a post-payment token presented to the session check.
    pub fn session_window(&self) -> TokenWindow {
        TokenWindow::Symmetric(self.session_validity_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted() {
        let secret = SecretKey::new("hunter2");
        assert!(!format!("{:?}", secret).contains("hunter2"));
    }

    #[test]
    fn test_defaults() {
        let config = PortalConfig::new(
            SecretKey::new("s"),
            "http://hotspot.lan",
            "http://backend/verify",
            "http://hotspot.lan/login",
        );
        assert_eq!(config.base_price.amount(), 3000);
        assert_eq!(config.allowed_methods.len(), DEFAULT_ALLOWED_METHODS.len());
        assert!(config.is_method_allowed(&PaymentMethod::OtherQris));
        assert!(!config.is_method_allowed(&PaymentMethod::CreditCard));
        assert_eq!(config.preauth_window(), TokenWindow::Symmetric(10));
        assert_eq!(config.initiation_window(), TokenWindow::MaxAge(60));
        assert_eq!(config.session_window(), TokenWindow::Symmetric(60));
    }
}
