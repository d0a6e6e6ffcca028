//! # Hotspot Types
//!
//! Domain types and port traits for the captive-portal payment service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Money, PaymentMethod, PaymentOrder, tokens)
//! - `ports/` - Trait definitions that adapters must implement
//! - `config/` - Immutable portal configuration injected at startup
//! - `dto/` - Query parameters and responses at the HTTP boundary
//! - `error/` - Domain, gateway and application error types

pub mod config;
pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use config::{PortalConfig, SecretKey};
pub use domain::{
    Charges, FeePolicy, FeeVatCalculator, LineItem, Money, OrderId, PaymentMethod, PaymentOrder,
    SessionToken, TokenWindow, TransactionOutcome, VatRate, parse_timestamp,
};
pub use dto::*;
pub use error::{DomainError, GatewayError, PortalError};
pub use ports::{Clock, PaymentGateway, SystemClock};
