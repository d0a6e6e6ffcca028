//! Payment order domain model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::fee::Charges;
use super::method::PaymentMethod;
use super::money::Money;

/// Namespace prefix of every order identifier issued by the portal.
pub const ORDER_NAMESPACE: &str = "hotspot";

/// Gateway order identifier, also used as the gateway's idempotency key.
///
/// Format: `hotspot-{device}-{nanos}` where `nanos` is the creation time in
/// nanoseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Builds a fresh order identifier for a device.
    pub fn generate(device_id: &str, created_at_nanos: i64) -> Self {
        Self(format!("{ORDER_NAMESPACE}-{device_id}-{created_at_nanos}"))
    }

    /// Wraps an identifier received back from the gateway.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line of the itemization sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
}

/// A transaction request handed to the gateway exactly once.
///
/// Orders are never stored: verification later relies only on the values
/// round-tripped through the callback URL and the order identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    pub order_id: OrderId,
    pub device_id: String,
    pub destination: String,
    pub method: PaymentMethod,
    pub charges: Charges,
    /// Label of the VAT line, e.g. `VAT 11%`.
    pub vat_label: String,
    pub callback_url: String,
}

impl PaymentOrder {
    pub fn base_amount(&self) -> Money {
        self.charges.base
    }

    pub fn fee(&self) -> Money {
        self.charges.fee
    }

    pub fn vat(&self) -> Money {
        self.charges.vat
    }

    pub fn gross_amount(&self) -> Money {
        self.charges.gross
    }

    /// Base, fee and VAT as three separate lines whose prices sum to the
    /// gross amount.
    pub fn line_items(&self) -> [LineItem; 3] {
        [
            LineItem {
                id: self.order_id.to_string(),
                name: "Internet Hotspot".to_string(),
                price: self.charges.base,
                quantity: 1,
            },
            LineItem {
                id: "fee".to_string(),
                name: "Settlement Fee".to_string(),
                price: self.charges.fee,
                quantity: 1,
            },
            LineItem {
                id: "vat".to_string(),
                name: self.vat_label.clone(),
                price: self.charges.vat,
                quantity: 1,
            },
        ]
    }
}
