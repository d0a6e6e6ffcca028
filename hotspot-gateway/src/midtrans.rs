//! Midtrans Snap adapter.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use hotspot_types::{GatewayError, OrderId, PaymentGateway, PaymentOrder};

use crate::config::{GatewayConfig, GatewayEndpoints};

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SnapRequest<'a> {
    transaction_details: TransactionDetails<'a>,
    item_details: Vec<ItemDetail>,
    customer_details: CustomerDetails,
    callbacks: Callbacks<'a>,
    enabled_payments: [&'a str; 1],
}

#[derive(Debug, Serialize)]
struct TransactionDetails<'a> {
    order_id: &'a str,
    gross_amount: i64,
}

#[derive(Debug, Serialize)]
struct ItemDetail {
    id: String,
    price: i64,
    quantity: u32,
    name: String,
}

#[derive(Debug, Serialize)]
struct CustomerDetails {
    first_name: String,
    email: String,
}

#[derive(Debug, Serialize)]
struct Callbacks<'a> {
    finish: &'a str,
}

#[derive(Debug, Deserialize)]
struct SnapResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    transaction_status: Option<String>,
}

impl<'a> SnapRequest<'a> {
    fn from_order(order: &'a PaymentOrder) -> Self {
        Self {
            transaction_details: TransactionDetails {
                order_id: order.order_id.as_str(),
                gross_amount: order.gross_amount().amount(),
            },
            item_details: order
                .line_items()
                .into_iter()
                .map(|item| ItemDetail {
                    id: item.id,
                    price: item.price.amount(),
                    quantity: item.quantity,
                    name: item.name,
                })
                .collect(),
            customer_details: CustomerDetails {
                first_name: order.device_id.clone(),
                email: format!("{}@mail.com", order.device_id),
            },
            callbacks: Callbacks {
                finish: &order.callback_url,
            },
            enabled_payments: [order.method.as_str()],
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Adapter
// ─────────────────────────────────────────────────────────────────────────────

/// `PaymentGateway` over the Midtrans HTTP APIs.
///
/// Authenticates with HTTP Basic (`server_key:`) and applies the configured
/// timeout to every call. No retries.
pub struct MidtransGateway {
    endpoints: GatewayEndpoints,
    status_base: Url,
    http: Client,
}

impl MidtransGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let endpoints = config.active().clone();
        let status_base = Url::parse(&endpoints.status_base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                GatewayError::Transport(format!(
                    "invalid status URL {:?}",
                    endpoints.status_base_url
                ))
            })?;

        Ok(Self {
            endpoints,
            status_base,
            http,
        })
    }

    /// `{status_base}/{order_id}/status`, with the order id escaped as a
    /// single path segment.
    fn status_url(&self, order_id: &OrderId) -> Url {
        let mut url = self.status_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(order_id.as_str()).push("status");
        }
        url
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(
        resp: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for MidtransGateway {
    #[instrument(
        skip(self, order),
        fields(order_id = %order.order_id, gross = order.gross_amount().amount())
    )]
    async fn create_transaction(&self, order: &PaymentOrder) -> Result<String, GatewayError> {
        let resp = self
            .http
            .post(&self.endpoints.snap_url)
            .basic_auth(&self.endpoints.server_key, None::<&str>)
            .json(&SnapRequest::from_order(order))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let snap: SnapResponse = Self::read_json(resp).await?;
        debug!("snap transaction created");
        snap.token
            .filter(|t| !t.is_empty())
            .ok_or(GatewayError::MissingToken)
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn query_status(&self, order_id: &OrderId) -> Result<Option<String>, GatewayError> {
        let resp = self
            .http
            .get(self.status_url(order_id))
            .basic_auth(&self.endpoints.server_key, None::<&str>)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status: StatusResponse = Self::read_json(resp).await?;
        debug!(status = ?status.transaction_status, "status fetched");
        Ok(status.transaction_status)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::{
        Json, Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    };
    use serde_json::{Value, json};

    use hotspot_types::{Charges, Money, PaymentMethod};

    use super::*;
    use crate::config::GatewayMode;

    #[derive(Default)]
    struct Seen {
        auth: Option<String>,
        body: Option<Value>,
        status_path: Option<String>,
    }

    type Shared = Arc<Mutex<Seen>>;

    async fn snap_ok(
        State(seen): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let mut seen = seen.lock().unwrap();
        seen.auth = headers
            .get("authorization")
            .map(|v| v.to_str().unwrap().to_string());
        seen.body = Some(body);
        Json(json!({ "token": "snap-abc", "redirect_url": "https://pay/abc" }))
    }

    async fn status_ok(State(seen): State<Shared>, Path(order_id): Path<String>) -> Json<Value> {
        seen.lock().unwrap().status_path = Some(order_id);
        Json(json!({ "status_code": "200", "transaction_status": "settlement" }))
    }

    /// Starts a fake gateway on an ephemeral port and returns its base URL.
    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn gateway(base: &str) -> MidtransGateway {
        let endpoints = GatewayEndpoints {
            server_key: "SB-Mid-server-key".into(),
            snap_url: format!("{base}/snap/v1/transactions"),
            status_base_url: format!("{base}/v2"),
        };
        MidtransGateway::new(&GatewayConfig {
            mode: GatewayMode::Sandbox,
            sandbox: endpoints.clone(),
            production: endpoints,
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    fn order() -> PaymentOrder {
        PaymentOrder {
            order_id: OrderId::generate("AA:BB", 7),
            device_id: "AA:BB".into(),
            destination: "http://hotspot.lan".into(),
            method: PaymentMethod::BniVa,
            charges: Charges {
                base: Money::new(3000).unwrap(),
                fee: Money::new(4000).unwrap(),
                vat: Money::new(330).unwrap(),
                gross: Money::new(7330).unwrap(),
            },
            vat_label: "VAT 11%".into(),
            callback_url: "https://backend/verify?order_id=hotspot-AA%3ABB-7".into(),
        }
    }

    #[tokio::test]
    async fn test_create_transaction_sends_snap_body() {
        let seen = Shared::default();
        let base = spawn(
            Router::new()
                .route("/snap/v1/transactions", post(snap_ok))
                .with_state(seen.clone()),
        )
        .await;

        let token = gateway(&base).create_transaction(&order()).await.unwrap();
        assert_eq!(token, "snap-abc");

        let seen = seen.lock().unwrap();
        // base64("SB-Mid-server-key:")
        assert_eq!(
            seen.auth.as_deref(),
            Some("Basic U0ItTWlkLXNlcnZlci1rZXk6")
        );
        let body = seen.body.as_ref().unwrap();
        assert_eq!(body["transaction_details"]["order_id"], "hotspot-AA:BB-7");
        assert_eq!(body["transaction_details"]["gross_amount"], 7330);
        assert_eq!(body["item_details"].as_array().unwrap().len(), 3);
        assert_eq!(body["item_details"][1]["id"], "fee");
        assert_eq!(body["item_details"][2]["name"], "VAT 11%");
        assert_eq!(body["customer_details"]["email"], "AA:BB@mail.com");
        assert_eq!(body["enabled_payments"], json!(["bni_va"]));
        assert_eq!(
            body["callbacks"]["finish"],
            "https://backend/verify?order_id=hotspot-AA%3ABB-7"
        );
    }

    #[tokio::test]
    async fn test_create_transaction_without_token() {
        let base = spawn(Router::new().route(
            "/snap/v1/transactions",
            post(|| async { Json(json!({ "error_messages": ["bad"] })) }),
        ))
        .await;

        let result = gateway(&base).create_transaction(&order()).await;
        assert!(matches!(result, Err(GatewayError::MissingToken)));
    }

    #[tokio::test]
    async fn test_create_transaction_http_error() {
        let base = spawn(Router::new().route(
            "/snap/v1/transactions",
            post(|| async { (StatusCode::UNAUTHORIZED, "Access denied") }),
        ))
        .await;

        let result = gateway(&base).create_transaction(&order()).await;
        assert!(matches!(result, Err(GatewayError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_query_status() {
        let seen = Shared::default();
        let base = spawn(
            Router::new()
                .route("/v2/{order_id}/status", get(status_ok))
                .with_state(seen.clone()),
        )
        .await;

        let status = gateway(&base)
            .query_status(&OrderId::from_raw("hotspot-AA-1"))
            .await
            .unwrap();

        assert_eq!(status.as_deref(), Some("settlement"));
        assert_eq!(seen.lock().unwrap().status_path.as_deref(), Some("hotspot-AA-1"));
    }

    #[test]
    fn test_status_url_escapes_order_id() {
        let gw = gateway("http://127.0.0.1:9");
        let url = gw.status_url(&OrderId::from_raw("a/b?c#d"));
        assert_eq!(url.as_str(), "http://127.0.0.1:9/v2/a%2Fb%3Fc%23d/status");

        let mut endpoints = GatewayEndpoints::sandbox("k");
        endpoints.status_base_url = "http://127.0.0.1:9/v2/".into();
        let gw = MidtransGateway::new(&GatewayConfig {
            mode: GatewayMode::Sandbox,
            sandbox: endpoints.clone(),
            production: endpoints,
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(
            gw.status_url(&OrderId::from_raw("hotspot-AA-1")).as_str(),
            "http://127.0.0.1:9/v2/hotspot-AA-1/status"
        );
    }

    #[tokio::test]
    async fn test_query_status_keeps_hostile_order_id_in_one_segment() {
        let seen = Shared::default();
        let base = spawn(
            Router::new()
                .route("/v2/{order_id}/status", get(status_ok))
                .with_state(seen.clone()),
        )
        .await;

        let status = gateway(&base)
            .query_status(&OrderId::from_raw("x/../y?z=1#f"))
            .await
            .unwrap();

        assert_eq!(status.as_deref(), Some("settlement"));
        assert_eq!(
            seen.lock().unwrap().status_path.as_deref(),
            Some("x/../y?z=1#f")
        );
    }

    #[test]
    fn test_rejects_unusable_status_url() {
        let mut endpoints = GatewayEndpoints::sandbox("k");
        endpoints.status_base_url = "mailto:ops@example.com".into();
        let result = MidtransGateway::new(&GatewayConfig {
            mode: GatewayMode::Sandbox,
            sandbox: endpoints.clone(),
            production: endpoints,
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }

    #[tokio::test]
    async fn test_query_status_unknown_order() {
        let base = spawn(Router::new().route(
            "/v2/{order_id}/status",
            get(|| async {
                Json(json!({ "status_code": "404", "status_message": "Transaction doesn't exist." }))
            }),
        ))
        .await;

        let status = gateway(&base)
            .query_status(&OrderId::from_raw("missing"))
            .await
            .unwrap();
        assert_eq!(status, None);
    }

    #[tokio::test]
    async fn test_query_status_unparseable_body() {
        let base = spawn(Router::new().route(
            "/v2/{order_id}/status",
            get(|| async { "<html>maintenance</html>" }),
        ))
        .await;

        let result = gateway(&base).query_status(&OrderId::from_raw("x")).await;
        assert!(matches!(result, Err(GatewayError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = gateway(&format!("http://{}", addr))
            .query_status(&OrderId::from_raw("x"))
            .await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }
}
