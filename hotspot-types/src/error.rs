//! Error types for the hotspot portal.

/// Domain-level errors (invalid values).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Amount overflow")]
    AmountOverflow,

    #[error("Invalid payment method: {0:?}")]
    InvalidPaymentMethod(String),

    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("Invalid VAT rate: {0:?}")]
    InvalidVatRate(String),
}

/// Payment gateway call failures.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Transport(String),

    #[error("Gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unreadable gateway response: {0}")]
    Decode(String),

    #[error("Gateway response carried no transaction token")]
    MissingToken,
}

/// Application-level errors (for HTTP responses).
///
/// Every variant is scoped to a single request.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Timestamp too far from current time")]
    TimestampOutOfRange,

    /// Token outside its validity window. Clients recover by restarting the
    /// flow at `redirect_to`.
    #[error("Token expired")]
    TokenExpired { redirect_to: String },

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Payment not yet completed")]
    PaymentNotAuthorized,

    #[error("Payment gateway unavailable: {0}")]
    Upstream(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for PortalError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::AmountOverflow => PortalError::Internal(err.to_string()),
            DomainError::InvalidPaymentMethod(_) => {
                PortalError::BadRequest("Invalid payment method".into())
            }
            e => PortalError::BadRequest(e.to_string()),
        }
    }
}

impl From<GatewayError> for PortalError {
    fn from(err: GatewayError) -> Self {
        PortalError::Upstream(err.to_string())
    }
}
