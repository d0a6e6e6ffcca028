//! # Hotspot Portal Server
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the Midtrans gateway adapter
//! - Create the portal service
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hotspot_gateway::MidtransGateway;
use hotspot_hex::{PortalService, inbound::HttpServer};

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("hotspot-portal"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (otel_tracer, otel_provider) = init_tracer()?;
    let telemetry = tracing_opentelemetry::layer().with_tracer(otel_tracer);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,hotspot_app=debug,hotspot_hex=debug,hotspot_gateway=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    let config = config::Config::from_env()?;

    tracing::info!("Starting hotspot portal on port {}", config.port);
    tracing::info!(
        mode = ?config.gateway.mode,
        snap_url = %config.gateway.active().snap_url,
        "Using payment gateway"
    );

    let gateway = MidtransGateway::new(&config.gateway)?;
    let service = PortalService::new(config.portal, gateway)?;

    let server = HttpServer::with_rate_limit(service, config.requests_per_minute);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Flush pending spans before exit
    let _ = otel_provider.shutdown();
    Ok(())
}
