//! Payment gateway port.
//!
//! The gateway owns transaction creation and status reporting. Adapters
//! (the Midtrans HTTP client, scripted test doubles) implement this trait.

use crate::domain::{OrderId, PaymentOrder};
use crate::error::GatewayError;

/// Port trait for the upstream payment gateway.
///
/// Both calls are idempotent per order identifier. Implementations make a
/// single attempt; retrying is left to the client restarting the flow.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Registers the order with the gateway and returns the client-side
    /// transaction token used to open the payment page.
    async fn create_transaction(&self, order: &PaymentOrder) -> Result<String, GatewayError>;

    /// Fetches the gateway's `transaction_status` for an order.
    ///
    /// `Ok(None)` means the gateway answered without a status.
    async fn query_status(&self, order_id: &OrderId) -> Result<Option<String>, GatewayError>;
}
