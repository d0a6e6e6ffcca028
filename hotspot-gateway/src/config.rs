//! Gateway endpoint selection.

use std::time::Duration;

/// Which set of gateway credentials and URLs is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    Sandbox,
    Production,
}

impl GatewayMode {
    pub fn from_sandbox_flag(use_sandbox: bool) -> Self {
        if use_sandbox {
            GatewayMode::Sandbox
        } else {
            GatewayMode::Production
        }
    }
}

/// Credentials and URLs for one mode.
#[derive(Clone)]
pub struct GatewayEndpoints {
    pub server_key: String,
    /// Snap transaction-creation URL.
    pub snap_url: String,
    /// Base of the status API; `/{order_id}/status` is appended.
    pub status_base_url: String,
}

impl GatewayEndpoints {
    pub fn sandbox(server_key: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
            snap_url: "https://app.sandbox.midtrans.com/snap/v1/transactions".to_string(),
            status_base_url: "https://api.sandbox.midtrans.com/v2".to_string(),
        }
    }

    pub fn production(server_key: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
            snap_url: "https://app.midtrans.com/snap/v1/transactions".to_string(),
            status_base_url: "https://api.midtrans.com/v2".to_string(),
        }
    }
}

impl std::fmt::Debug for GatewayEndpoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayEndpoints")
            .field("server_key", &"<redacted>")
            .field("snap_url", &self.snap_url)
            .field("status_base_url", &self.status_base_url)
            .finish()
    }
}

/// Everything the Midtrans adapter needs.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    pub sandbox: GatewayEndpoints,
    pub production: GatewayEndpoints,
    /// Per-request timeout for both gateway calls.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Endpoints of the active mode.
    pub fn active(&self) -> &GatewayEndpoints {
        match self.mode {
            GatewayMode::Sandbox => &self.sandbox,
            GatewayMode::Production => &self.production,
        }
    }
}
