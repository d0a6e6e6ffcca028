//! # Hotspot Hex
//!
//! Application service layer and HTTP adapter for the captive-portal
//! payment flow.
//!
//! ## Architecture
//!
//! - `token` / `builder` / `resolver` / `redirect` - the flow components
//! - `service/` - Application service (orchestrates the components)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `G: PaymentGateway`, allowing the real
//! gateway or a scripted double to be injected.

pub mod builder;
pub mod inbound;
pub mod openapi;
pub mod redirect;
pub mod resolver;
pub mod service;
pub mod token;


pub use service::PortalService;
pub use token::{TokenRejection, TokenService};
