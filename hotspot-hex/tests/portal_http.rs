//! Integration tests for the portal endpoints.
//!
//! These drive the full router (middleware included) with in-process
//! requests and a scripted gateway.

mod common;

use std::collections::HashMap;
use std::sync::atomic::Ordering;

use axum::http::{StatusCode, header};
use tower::ServiceExt;

use hotspot_hex::TokenService;
use hotspot_types::{SecretKey, TokenWindow};

use common::{MAC, NOW, SECRET, body_string, enc, get, server_with};

fn tokens() -> TokenService {
    TokenService::new(SecretKey::new(SECRET))
}

#[tokio::test]
async fn test_preauth_issues_verifiable_token() {
    let (server, _) = server_with(None, 100);
    let app = server.router();

    let response = app
        .oneshot(get(&format!("/preauth?mac={}&timestamp={}", enc(MAC), NOW - 5)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    let token = json["token"].as_str().unwrap();
    assert!(tokens().verify(MAC, NOW - 5, token, TokenWindow::Symmetric(10), NOW));
}

#[tokio::test]
async fn test_preauth_rejects_skewed_timestamp() {
    let (server, _) = server_with(None, 100);
    let response = server
        .router()
        .oneshot(get(&format!("/preauth?mac={}&timestamp={}", enc(MAC), NOW - 11)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_preauth_missing_params() {
    let (server, _) = server_with(None, 100);
    let response = server
        .router()
        .oneshot(get(&format!("/preauth?mac={}", enc(MAC))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "Missing parameters");
}

#[tokio::test]
async fn test_pay_returns_gateway_token() {
    let (server, _) = server_with(None, 100);
    let token = tokens().generate(MAC, NOW - 2).into_string();

    let response = server
        .router()
        .oneshot(get(&format!(
            "/pay?mac={}&method=gopay&timestamp={}&token={}",
            enc(MAC),
            NOW - 2,
            enc(&token)
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["token"], "snap-token");
}

#[tokio::test]
async fn test_pay_expired_token_soft_redirect() {
    let (server, _) = server_with(None, 100);
    let token = tokens().generate(MAC, NOW - 61).into_string();

    let response = server
        .router()
        .oneshot(get(&format!(
            "/pay?mac={}&timestamp={}&token={}",
            enc(MAC),
            NOW - 61,
            enc(&token)
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));
    let body = body_string(response).await;
    assert!(body.contains(r#"location.href = "http://hotspot.lan";"#));
}

#[tokio::test]
async fn test_pay_invalid_token_forbidden() {
    let (server, _) = server_with(None, 100);

    let response = server
        .router()
        .oneshot(get(&format!(
            "/pay?mac={}&timestamp={}&token={}",
            enc(MAC),
            NOW,
            enc("bm90LWEtdG9rZW4=")
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::LOCATION).is_none());
    assert_eq!(body_string(response).await, "Invalid token");
}

#[tokio::test]
async fn test_pay_disallowed_method() {
    let (server, _) = server_with(None, 100);
    let token = tokens().generate(MAC, NOW).into_string();

    let response = server
        .router()
        .oneshot(get(&format!(
            "/pay?mac={}&method=credit_card&timestamp={}&token={}",
            enc(MAC),
            NOW,
            enc(&token)
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "Invalid payment method");
}

#[tokio::test]
async fn test_verify_settlement_redirects_to_login() {
    let (server, queries) = server_with(None, 100);

    let response = server
        .router()
        .oneshot(get(&format!(
            "/verify?order_id=hotspot-x-1&mac={}&dst={}&transaction_status=settlement",
            enc(MAC),
            enc("http://example.com/page?a=1")
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("http://hotspot.lan/login?username="));

    let url = reqwest::Url::parse(&location).unwrap();
    let q: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(q["username"], format!("T-{MAC}"));
    assert_eq!(q["dst"], "http://example.com/page?a=1");
    assert_eq!(q["timestamp"], NOW.to_string());
    assert!(tokens().verify(MAC, NOW, &q["token"], TokenWindow::Symmetric(60), NOW));
    assert_eq!(queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_verify_pending_forbidden() {
    let (server, _) = server_with(None, 100);

    let response = server
        .router()
        .oneshot(get(&format!(
            "/verify?order_id=hotspot-x-1&mac={}&transaction_status=pending",
            enc(MAC)
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(response).await, "Payment not yet completed");
}

#[tokio::test]
async fn test_verify_without_status_queries_gateway_once() {
    let (server, queries) = server_with(Some("capture"), 100);

    let response = server
        .router()
        .oneshot(get(&format!("/verify?order_id=hotspot-x-1&mac={}", enc(MAC))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_check_ok_and_tampered() {
    let (server, _) = server_with(None, 100);
    let app = server.router();
    let token = tokens().generate(MAC, NOW - 10).into_string();

    let ok = app
        .clone()
        .oneshot(get(&format!(
            "/auth?mac={}&timestamp={}&token={}",
            enc(MAC),
            NOW - 10,
            enc(&token)
        )))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(body_string(ok).await, "OK");

    let mut tampered = token.into_bytes();
    tampered[3] = if tampered[3] == b'Q' { b'R' } else { b'Q' };
    let tampered = String::from_utf8(tampered).unwrap();

    let rejected = app
        .oneshot(get(&format!(
            "/auth?mac={}&timestamp={}&token={}",
            enc(MAC),
            NOW - 10,
            enc(&tampered)
        )))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_session_check_future_token_expired() {
    let (server, _) = server_with(None, 100);
    let token = tokens().generate(MAC, NOW + 61).into_string();

    let response = server
        .router()
        .oneshot(get(&format!(
            "/auth?mac={}&timestamp={}&token={}",
            enc(MAC),
            NOW + 61,
            enc(&token)
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Token expired"));
}

#[tokio::test]
async fn test_sub_paths_are_routed() {
    let (server, _) = server_with(None, 100);
    let response = server
        .router()
        .oneshot(get(&format!(
            "/preauth/device?mac={}&timestamp={}",
            enc(MAC),
            NOW
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_path_not_found() {
    let (server, _) = server_with(None, 100);
    let response = server.router().oneshot(get("/nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "Not found");
}

#[tokio::test]
async fn test_cors_origin_is_default_destination() {
    let (server, _) = server_with(None, 100);
    let request = axum::http::Request::builder()
        .uri(format!("/preauth?mac={}&timestamp={}", enc(MAC), NOW))
        .header(header::ORIGIN, "http://hotspot.lan")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = server.router().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://hotspot.lan"
    );
}
