//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;

use hotspot_hex::{PortalService, inbound::HttpServer};
use hotspot_types::{
    Clock, GatewayError, OrderId, PaymentGateway, PaymentOrder, PortalConfig, SecretKey,
};

pub const NOW: i64 = 1_700_000_000;
pub const MAC: &str = "AA:BB:CC:DD:EE:FF";
pub const SECRET: &str = "integration-secret";

/// Gateway double: always hands out `snap-token`, reports `status`.
pub struct ScriptedGateway {
    pub status: Option<String>,
    pub status_queries: Arc<AtomicUsize>,
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn create_transaction(&self, _order: &PaymentOrder) -> Result<String, GatewayError> {
        Ok("snap-token".to_string())
    }

    async fn query_status(&self, _order_id: &OrderId) -> Result<Option<String>, GatewayError> {
        self.status_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.status.clone())
    }
}

pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.0, 0).unwrap()
    }
}

pub fn config() -> PortalConfig {
    PortalConfig::new(
        SecretKey::new(SECRET),
        "http://hotspot.lan",
        "https://backend.example/verify",
        "http://hotspot.lan/login",
    )
}

pub fn server_with(
    status: Option<&str>,
    requests_per_minute: u32,
) -> (HttpServer<ScriptedGateway>, Arc<AtomicUsize>) {
    let queries = Arc::new(AtomicUsize::new(0));
    let gateway = ScriptedGateway {
        status: status.map(String::from),
        status_queries: queries.clone(),
    };
    let service =
        PortalService::with_clock(config(), gateway, Arc::new(FixedClock(NOW))).unwrap();
    (HttpServer::with_rate_limit(service, requests_per_minute), queries)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Percent-encodes a query value (tokens contain `+`, `/` and `=`).
pub fn enc(value: &str) -> String {
    reqwest::Url::parse_with_params("http://x/", &[("v", value)])
        .unwrap()
        .query()
        .unwrap()
        .trim_start_matches("v=")
        .to_string()
}
