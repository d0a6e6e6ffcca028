//! Portal Application Service
//!
//! Orchestrates the token, pricing, order and status components behind the
//! four portal operations. Contains NO HTTP logic - pure flow control.

use std::sync::Arc;

use hotspot_types::{
    Clock, FeeVatCalculator, OrderId, PayQuery, PaymentGateway, PaymentMethod, PortalConfig,
    PortalError, PreAuthQuery, SessionQuery, SystemClock, TokenResponse, TokenWindow, VerifyQuery,
    parse_timestamp,
};

use crate::builder::TransactionBuilder;
use crate::redirect::SessionRedirectIssuer;
use crate::resolver::{PaymentDisposition, PaymentStatusResolver};
use crate::token::{TokenRejection, TokenService};

/// Application service for the captive-portal payment flow.
///
/// Generic over `G: PaymentGateway` - the gateway adapter is injected at
/// compile time. Holds no per-request state, so one instance serves every
/// request concurrently.
pub struct PortalService<G: PaymentGateway> {
    config: PortalConfig,
    tokens: TokenService,
    calculator: FeeVatCalculator,
    builder: TransactionBuilder,
    resolver: PaymentStatusResolver<G>,
    issuer: SessionRedirectIssuer,
    gateway: Arc<G>,
    clock: Arc<dyn Clock>,
}

impl<G: PaymentGateway> PortalService<G> {
    /// Creates a service on the wall clock.
    pub fn new(config: PortalConfig, gateway: G) -> Result<Self, PortalError> {
        Self::with_clock(config, gateway, Arc::new(SystemClock))
    }

    /// Creates a service with an explicit time source.
    pub fn with_clock(
        config: PortalConfig,
        gateway: G,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PortalError> {
        let gateway = Arc::new(gateway);
        let tokens = TokenService::new(config.secret.clone());
        let calculator = FeeVatCalculator::new(config.vat);
        let builder = TransactionBuilder::new(&config.callback_url, config.vat)?;
        let resolver = PaymentStatusResolver::new(gateway.clone(), config.trust_callback_status);
        let issuer = SessionRedirectIssuer::new(
            tokens.clone(),
            &config.login_redirect_base,
            config.username_prefix.clone(),
        )?;

        Ok(Self {
            config,
            tokens,
            calculator,
            builder,
            resolver,
            issuer,
            gateway,
            clock,
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Returns a reference to the underlying gateway adapter.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Pre-auth
    // ─────────────────────────────────────────────────────────────────────────────

    /// Issues a short-lived token for a device whose clock agrees with ours.
    pub fn pre_auth(&self, query: PreAuthQuery) -> Result<TokenResponse, PortalError> {
        let missing = || PortalError::BadRequest("Missing parameters".into());
        let mac = present(query.mac).ok_or_else(missing)?;
        let timestamp = present(query.timestamp)
            .and_then(|raw| parse_timestamp(&raw).ok())
            .ok_or_else(missing)?;

        let now = self.clock.unix_seconds();
        if !self.config.preauth_window().admits(now, timestamp) {
            tracing::warn!(%mac, timestamp, now, "pre-auth timestamp outside window");
            return Err(PortalError::TimestampOutOfRange);
        }

        let token = self.tokens.generate(&mac, timestamp);
        Ok(TokenResponse {
            token: token.into_string(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment initiation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Validates the pre-auth token, prices the order and registers it
    /// with the gateway. Returns the gateway's transaction token.
    pub async fn initiate_payment(&self, query: PayQuery) -> Result<TokenResponse, PortalError> {
        let missing = || PortalError::BadRequest("Missing required parameters.".into());
        let mac = present(query.mac).ok_or_else(missing)?;
        let destination =
            present(query.dst).unwrap_or_else(|| self.config.default_destination.clone());
        let method = match present(query.method) {
            Some(raw) => raw.parse::<PaymentMethod>()?,
            None => self.config.default_method.clone(),
        };
        let timestamp = present(query.timestamp)
            .and_then(|raw| parse_timestamp(&raw).ok())
            .ok_or_else(missing)?;
        let token = present(query.token).ok_or_else(missing)?;

        if !self.config.is_method_allowed(&method) {
            tracing::warn!(%mac, %method, "payment method not allowed");
            return Err(PortalError::BadRequest("Invalid payment method".into()));
        }

        self.check_token(&mac, timestamp, &token, self.config.initiation_window())?;

        let charges = self.calculator.charges(self.config.base_price, &method)?;
        let order = self.builder.build(
            &mac,
            &destination,
            method,
            charges,
            self.clock.unix_nanos(),
        );

        tracing::info!(
            order_id = %order.order_id,
            method = %order.method,
            gross = %order.gross_amount(),
            "creating gateway transaction"
        );

        let gateway_token = self
            .gateway
            .create_transaction(&order)
            .await
            .map_err(|e| {
                tracing::error!(
                    order_id = %order.order_id,
                    error = %e,
                    "gateway transaction failed"
                );
                PortalError::from(e)
            })?;

        Ok(TokenResponse {
            token: gateway_token,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Verification callback
    // ─────────────────────────────────────────────────────────────────────────────

    /// Resolves the order's status and, once paid, returns the login
    /// redirect target.
    pub async fn verify_payment(&self, query: VerifyQuery) -> Result<String, PortalError> {
        let missing = || PortalError::BadRequest("Missing callback parameters".into());
        let order_id = present(query.order_id)
            .map(OrderId::from_raw)
            .ok_or_else(missing)?;
        let mac = present(query.mac).ok_or_else(missing)?;
        let destination =
            present(query.dst).unwrap_or_else(|| self.config.default_destination.clone());

        match self
            .resolver
            .resolve(&order_id, query.transaction_status.as_deref())
            .await
        {
            PaymentDisposition::Authorized { outcome, source } => {
                tracing::info!(%order_id, %mac, %outcome, ?source, "payment authorized");
                let now = self.clock.unix_seconds();
                Ok(self.issuer.issue(&mac, &destination, now))
            }
            PaymentDisposition::NotAuthorized { outcome, source } => {
                tracing::warn!(%order_id, %mac, ?outcome, ?source, "payment not authorized");
                Err(PortalError::PaymentNotAuthorized)
            }
            PaymentDisposition::Unresolved(e) => {
                tracing::error!(%order_id, %mac, error = %e, "payment status query failed");
                Err(PortalError::PaymentNotAuthorized)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Session check
    // ─────────────────────────────────────────────────────────────────────────────

    /// Re-validates a post-payment token for ongoing access gating.
    pub fn check_session(&self, query: SessionQuery) -> Result<(), PortalError> {
        let missing = || PortalError::BadRequest("Missing auth parameters".into());
        let mac = present(query.mac).ok_or_else(missing)?;
        let timestamp = present(query.timestamp)
            .and_then(|raw| parse_timestamp(&raw).ok())
            .ok_or_else(missing)?;
        let token = present(query.token).ok_or_else(missing)?;

        self.check_token(&mac, timestamp, &token, self.config.session_window())
    }

    fn check_token(
        &self,
        mac: &str,
        timestamp: i64,
        token: &str,
        window: TokenWindow,
    ) -> Result<(), PortalError> {
        let now = self.clock.unix_seconds();
        match self.tokens.check(mac, timestamp, token, window, now) {
            Ok(()) => Ok(()),
            Err(TokenRejection::Expired) => {
                tracing::warn!(%mac, timestamp, now, "token expired");
                Err(PortalError::TokenExpired {
                    redirect_to: self.config.default_destination.clone(),
                })
            }
            Err(TokenRejection::Mismatch) => {
                tracing::warn!(%mac, timestamp, "token mismatch");
                Err(PortalError::TokenInvalid)
            }
        }
    }
}

/// Treats an empty query value the same as an absent one.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
