//! Payment status resolution.
//!
//! ```text
//! Start ──inline status──────────────▶ Classified(status)
//!   │                                        │
//!   └──no status──▶ Querying ──ok──▶ Classified(status)
//!                       │                    ├─ settlement | capture ─▶ Authorized
//!                       └─err─▶ Unresolved   └─ anything else ───────▶ NotAuthorized
//! ```

use std::sync::Arc;

use hotspot_types::{GatewayError, OrderId, PaymentGateway, TransactionOutcome};

/// Where the classified status came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSource {
    InBand,
    Gateway,
}

/// Terminal state of one resolution.
#[derive(Debug)]
pub enum PaymentDisposition {
    Authorized {
        outcome: TransactionOutcome,
        source: StatusSource,
    },
    /// `outcome` is `None` when the gateway answered without any status.
    NotAuthorized {
        outcome: Option<TransactionOutcome>,
        source: StatusSource,
    },
    /// The status query itself failed. Not retried.
    Unresolved(GatewayError),
}

impl PaymentDisposition {
    pub fn is_authorized(&self) -> bool {
        matches!(self, PaymentDisposition::Authorized { .. })
    }
}

/// Decides whether a gateway transaction is paid.
pub struct PaymentStatusResolver<G: PaymentGateway> {
    gateway: Arc<G>,
    trust_inline_status: bool,
}

impl<G: PaymentGateway> PaymentStatusResolver<G> {
    pub fn new(gateway: Arc<G>, trust_inline_status: bool) -> Self {
        Self {
            gateway,
            trust_inline_status,
        }
    }

    /// Resolves `order_id`, making at most one gateway call.
    ///
    /// An empty inline status counts as absent.
    pub async fn resolve(
        &self,
        order_id: &OrderId,
        inline_status: Option<&str>,
    ) -> PaymentDisposition {
        let inline = inline_status
            .filter(|s| !s.is_empty())
            .filter(|_| self.trust_inline_status);

        if let Some(status) = inline {
            return classify(Some(status), StatusSource::InBand);
        }

        match self.gateway.query_status(order_id).await {
            Ok(status) => classify(status.as_deref(), StatusSource::Gateway),
            Err(e) => PaymentDisposition::Unresolved(e),
        }
    }
}

fn classify(status: Option<&str>, source: StatusSource) -> PaymentDisposition {
    let Some(status) = status else {
        return PaymentDisposition::NotAuthorized {
            outcome: None,
            source,
        };
    };

    let outcome = TransactionOutcome::from_status(status);
    if outcome.is_authorizing() {
        PaymentDisposition::Authorized { outcome, source }
    } else {
        PaymentDisposition::NotAuthorized {
            outcome: Some(outcome),
            source,
        }
    }
}
