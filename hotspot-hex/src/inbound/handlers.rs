//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use hotspot_types::{
    PayQuery, PaymentGateway, PortalError, PreAuthQuery, SessionQuery, TokenResponse, VerifyQuery,
};

use crate::PortalService;

/// Application state shared across handlers.
pub struct AppState<G: PaymentGateway> {
    pub service: PortalService<G>,
}

/// Wrapper to implement IntoResponse for PortalError (orphan rule workaround).
pub struct ApiError(pub PortalError);

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PortalError::TokenExpired { redirect_to } => {
                return soft_redirect(redirect_to).into_response();
            }
            PortalError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PortalError::TimestampOutOfRange
            | PortalError::TokenInvalid
            | PortalError::PaymentNotAuthorized => StatusCode::FORBIDDEN,
            PortalError::Upstream(_) => StatusCode::BAD_GATEWAY,
            PortalError::NotFound => StatusCode::NOT_FOUND,
            PortalError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
            }
        };

        (status, self.0.to_string()).into_response()
    }
}

/// 200 page that sends a browser back to the start of the flow.
fn soft_redirect(target: &str) -> Html<String> {
    // JSON string escaping yields a valid JS string literal.
    let target = serde_json::to_string(target).unwrap_or_else(|_| "\"/\"".to_string());
    Html(format!(
        "<script>\n  console.warn(\"Token expired\");\n  location.href = {target};\n</script>\n"
    ))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Issue a pre-auth token.
#[tracing::instrument(skip(state, query), fields(mac = ?query.mac))]
pub async fn pre_auth<G: PaymentGateway>(
    State(state): State<Arc<AppState<G>>>,
    Query(query): Query<PreAuthQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    let resp = state.service.pre_auth(query)?;
    Ok(Json(resp))
}

/// Start a gateway transaction.
#[tracing::instrument(skip(state, query), fields(mac = ?query.mac, method = ?query.method))]
pub async fn pay<G: PaymentGateway>(
    State(state): State<Arc<AppState<G>>>,
    Query(query): Query<PayQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    let resp = state.service.initiate_payment(query).await?;
    Ok(Json(resp))
}

/// Gateway finish callback: redirect to the login page once paid.
#[tracing::instrument(skip(state, query), fields(mac = ?query.mac, order_id = ?query.order_id))]
pub async fn verify<G: PaymentGateway>(
    State(state): State<Arc<AppState<G>>>,
    Query(query): Query<VerifyQuery>,
) -> Result<Response, ApiError> {
    let location = state.service.verify_payment(query).await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Revalidate a session token.
#[tracing::instrument(skip(state, query), fields(mac = ?query.mac))]
pub async fn session_check<G: PaymentGateway>(
    State(state): State<Arc<AppState<G>>>,
    Query(query): Query<SessionQuery>,
) -> Result<&'static str, ApiError> {
    state.service.check_session(query)?;
    Ok("OK")
}

/// Anything outside the portal's path prefixes.
pub async fn not_found() -> ApiError {
    ApiError(PortalError::NotFound)
}
