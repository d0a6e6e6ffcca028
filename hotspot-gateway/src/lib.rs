//! # Hotspot Gateway
//!
//! Outbound adapter implementing the `PaymentGateway` port against the
//! Midtrans Snap and Core status APIs.

pub mod config;
pub mod midtrans;

pub use config::{GatewayConfig, GatewayEndpoints, GatewayMode};
pub use midtrans::MidtransGateway;
