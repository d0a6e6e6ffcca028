//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hotspot_types::PaymentGateway;

use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::PortalService;
use crate::openapi::ApiDoc;

/// HTTP Server for the captive-portal API.
pub struct HttpServer<G: PaymentGateway> {
    state: Arc<AppState<G>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<G: PaymentGateway> HttpServer<G> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: PortalService<G>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::default()), // 120 req/min per device
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(service: PortalService<G>, requests_per_minute: u32) -> Self {
        use std::time::Duration;
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::new(
                requests_per_minute,
                Duration::from_secs(60),
            )),
        }
    }

    /// Builds the Axum router with all routes.
    ///
    /// Each portal endpoint answers on its exact path and on any sub-path
    /// (`/pay`, `/pay/...`).
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route("/preauth", get(handlers::pre_auth::<G>))
            .route("/preauth/{*rest}", get(handlers::pre_auth::<G>))
            .route("/pay", get(handlers::pay::<G>))
            .route("/pay/{*rest}", get(handlers::pay::<G>))
            .route("/verify", get(handlers::verify::<G>))
            .route("/verify/{*rest}", get(handlers::verify::<G>))
            .route("/auth", get(handlers::session_check::<G>))
            .route("/auth/{*rest}", get(handlers::session_check::<G>))
            .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .fallback(handlers::not_found)
            .layer(metrics)
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(self.cors())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Lets the captive-portal page (served from the default destination)
    /// call the API from the browser.
    fn cors(&self) -> CorsLayer {
        let origin = &self.state.service.config().default_destination;
        let cors = CorsLayer::new().allow_methods([Method::GET]);
        match HeaderValue::from_str(origin.trim_end_matches('/')) {
            Ok(value) => cors.allow_origin(value),
            Err(e) => {
                tracing::warn!("default destination {:?} is not a valid origin: {}", origin, e);
                cors
            }
        }
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
