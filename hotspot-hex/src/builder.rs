//! Builds gateway-agnostic payment orders.

use reqwest::Url;

use hotspot_types::{Charges, OrderId, PaymentMethod, PaymentOrder, PortalError, VatRate};

/// Composes a [`PaymentOrder`] and its verification callback URL.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    callback_base: Url,
    vat: VatRate,
}

impl TransactionBuilder {
    /// Fails if the callback URL is not absolute.
    pub fn new(callback_url: &str, vat: VatRate) -> Result<Self, PortalError> {
        let callback_base = Url::parse(callback_url).map_err(|e| {
            PortalError::Internal(format!("invalid callback URL {callback_url:?}: {e}"))
        })?;
        Ok(Self { callback_base, vat })
    }

    /// Builds the order for one initiation request.
    ///
    /// The callback URL carries `order_id`, `mac` and the encoded `dst` so
    /// the verification step can run without any stored state.
    pub fn build(
        &self,
        device_id: &str,
        destination: &str,
        method: PaymentMethod,
        charges: Charges,
        created_at_nanos: i64,
    ) -> PaymentOrder {
        let order_id = OrderId::generate(device_id, created_at_nanos);

        let mut callback = self.callback_base.clone();
        callback
            .query_pairs_mut()
            .append_pair("order_id", order_id.as_str())
            .append_pair("mac", device_id)
            .append_pair("dst", destination);

        PaymentOrder {
            order_id,
            device_id: device_id.to_string(),
            destination: destination.to_string(),
            method,
            charges,
            vat_label: format!("VAT {}%", self.vat),
            callback_url: callback.into(),
        }
    }
}
