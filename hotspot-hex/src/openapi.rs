//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use hotspot_types::dto::{PayQuery, PreAuthQuery, SessionQuery, TokenResponse, VerifyQuery};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Issue a pre-auth token for a device
#[utoipa::path(
    get,
    path = "/preauth",
    tag = "portal",
    params(PreAuthQuery),
    responses(
        (status = 200, description = "Token for (mac, timestamp)", body = TokenResponse),
        (status = 400, description = "Missing parameters"),
        (status = 403, description = "Timestamp too far from current time")
    )
)]
async fn pre_auth() {}

/// Create a gateway transaction for the device
#[utoipa::path(
    get,
    path = "/pay",
    tag = "portal",
    params(PayQuery),
    responses(
        (status = 200, description = "Gateway transaction token, or an HTML soft redirect when the pre-auth token expired", body = TokenResponse),
        (status = 400, description = "Missing parameters or payment method not allowed"),
        (status = 403, description = "Invalid token"),
        (status = 502, description = "Payment gateway unavailable")
    )
)]
async fn pay() {}

/// Gateway finish callback
#[utoipa::path(
    get,
    path = "/verify",
    tag = "portal",
    params(VerifyQuery),
    responses(
        (status = 302, description = "Payment settled; redirect to the hotspot login page"),
        (status = 400, description = "Missing callback parameters"),
        (status = 403, description = "Payment not yet completed")
    )
)]
async fn verify() {}

/// Revalidate a post-payment session token
#[utoipa::path(
    get,
    path = "/auth",
    tag = "portal",
    params(SessionQuery),
    responses(
        (status = 200, description = "`OK`, or an HTML soft redirect when the token expired"),
        (status = 400, description = "Missing auth parameters"),
        (status = 403, description = "Invalid token")
    )
)]
async fn session_check() {}

/// OpenAPI documentation for the hotspot portal API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hotspot Payment Portal API",
        version = "1.0.0",
        description = "Pay-to-connect captive portal backend.\n\n## Flow\n\n1. `GET /preauth` returns a short-lived token for the device.\n2. `GET /pay` checks that token and opens a gateway transaction.\n3. The gateway sends the browser to `GET /verify`, which redirects to the hotspot login page once the payment settles.\n4. `GET /auth` revalidates the post-payment token.",
        license(name = "MIT"),
    ),
    paths(health, pre_auth, pay, verify, session_check),
    components(schemas(TokenResponse)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "portal", description = "Captive-portal payment flow"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_portal_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/preauth", "/pay", "/verify", "/auth"] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
