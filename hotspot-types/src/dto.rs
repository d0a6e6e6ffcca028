//! Data Transfer Objects (DTOs) for requests and responses.
//!
//! Every query field is optional so that a missing parameter is reported by
//! the service with the portal's own message instead of an extractor
//! rejection.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ─────────────────────────────────────────────────────────────────────────────
// Token DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query of `GET /preauth`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreAuthQuery {
    /// Device MAC address
    #[param(example = "AA:BB:CC:DD:EE:FF")]
    pub mac: Option<String>,
    /// Client time, Unix seconds
    #[param(example = "1700000000")]
    pub timestamp: Option<String>,
}

/// Query of `GET /auth`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SessionQuery {
    pub mac: Option<String>,
    /// Timestamp the token was minted for
    pub timestamp: Option<String>,
    pub token: Option<String>,
}

/// A freshly minted token (or the gateway's transaction token).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "q0c0vGx4JmH1Yx1m0k0nS0p3dU0S2b1Jp7b1b3Zr0xk=")]
    pub token: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query of `GET /pay`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PayQuery {
    pub mac: Option<String>,
    /// Where the device wanted to go; defaults to the portal's destination
    pub dst: Option<String>,
    /// Gateway payment method code; defaults to `other_qris`
    #[param(example = "gopay")]
    pub method: Option<String>,
    pub timestamp: Option<String>,
    /// Pre-auth token for `(mac, timestamp)`
    pub token: Option<String>,
}

/// Query of `GET /verify`, the gateway's finish callback.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerifyQuery {
    pub order_id: Option<String>,
    pub mac: Option<String>,
    pub dst: Option<String>,
    /// Status reported in-band by the gateway redirect
    #[param(example = "settlement")]
    pub transaction_status: Option<String>,
}
