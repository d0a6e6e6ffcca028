//! # Hotspot Portal Client SDK
//!
//! A typed Rust client for the portal endpoints. Redirects are never
//! followed, so `verify` hands back the login URL the portal issued.

use hotspot_types::{PayQuery, PreAuthQuery, SessionQuery, TokenResponse, VerifyQuery};
use reqwest::{Client, StatusCode, header, redirect};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The portal answered with its soft-expiry redirect page.
    #[error("Token expired")]
    TokenExpired,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Payment request parameters for [`PortalClient::pay`].
#[derive(Debug, Clone, Default)]
pub struct PayRequest {
    pub mac: String,
    pub timestamp: i64,
    pub token: String,
    pub dst: Option<String>,
    pub method: Option<String>,
}

/// Portal API client.
pub struct PortalClient {
    base_url: String,
    http: Client,
}

impl PortalClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().redirect(redirect::Policy::none()).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Checks if the portal is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Requests a pre-auth token for `mac` at `timestamp`.
    pub async fn pre_auth(&self, mac: &str, timestamp: i64) -> Result<TokenResponse, ClientError> {
        let query = PreAuthQuery {
            mac: Some(mac.to_string()),
            timestamp: Some(timestamp.to_string()),
        };
        let resp = self.get("/preauth", &query).await?;
        Self::json(resp).await
    }

    /// Starts a payment and returns the gateway's transaction token.
    pub async fn pay(&self, request: PayRequest) -> Result<TokenResponse, ClientError> {
        let query = PayQuery {
            mac: Some(request.mac),
            dst: request.dst,
            method: request.method,
            timestamp: Some(request.timestamp.to_string()),
            token: Some(request.token),
        };
        let resp = self.get("/pay", &query).await?;
        Self::json(resp).await
    }

    /// Replays the gateway's finish callback and returns the login redirect.
    pub async fn verify(
        &self,
        order_id: &str,
        mac: &str,
        dst: Option<&str>,
        transaction_status: Option<&str>,
    ) -> Result<String, ClientError> {
        let query = VerifyQuery {
            order_id: Some(order_id.to_string()),
            mac: Some(mac.to_string()),
            dst: dst.map(String::from),
            transaction_status: transaction_status.map(String::from),
        };
        let resp = self.get("/verify", &query).await?;

        if resp.status() == StatusCode::FOUND {
            if let Some(location) = resp
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                return Ok(location.to_string());
            }
        }
        Err(Self::api_error(resp).await)
    }

    /// Validates a session token. `Ok(())` means the portal answered `OK`.
    pub async fn check_session(
        &self,
        mac: &str,
        timestamp: i64,
        token: &str,
    ) -> Result<(), ClientError> {
        let query = SessionQuery {
            mac: Some(mac.to_string()),
            timestamp: Some(timestamp.to_string()),
            token: Some(token.to_string()),
        };
        let resp = self.get("/auth", &query).await?;
        Self::ensure_not_expired(&resp)?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(resp).await)
        }
    }

    async fn get<Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<reqwest::Response, ClientError> {
        Ok(self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?)
    }

    fn ensure_not_expired(resp: &reqwest::Response) -> Result<(), ClientError> {
        let is_html = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("text/html"));
        if resp.status().is_success() && is_html {
            return Err(ClientError::TokenExpired);
        }
        Ok(())
    }

    async fn json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        Self::ensure_not_expired(&resp)?;
        if resp.status().is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(Self::api_error(resp).await)
        }
    }

    async fn api_error(resp: reqwest::Response) -> ClientError {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        ClientError::Api { status, message }
    }
}
