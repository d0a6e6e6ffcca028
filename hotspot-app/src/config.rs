//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use hotspot_gateway::{GatewayConfig, GatewayEndpoints, GatewayMode};
use hotspot_types::{Money, PaymentMethod, PortalConfig, SecretKey, VatRate};

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub requests_per_minute: u32,
    pub portal: PortalConfig,
    pub gateway: GatewayConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| anyhow::anyhow!("{key} environment variable is required"))
        };

        let port = parse_or(&var, "PORT", 3000)?;
        let requests_per_minute = parse_or(&var, "RATE_LIMIT_PER_MINUTE", 120)?;

        // Gateway
        let use_sandbox = parse_or(&var, "MIDTRANS_USE_SANDBOX", true)?;
        let mode = GatewayMode::from_sandbox_flag(use_sandbox);
        let sandbox_key = var("MIDTRANS_SANDBOX_SERVER_KEY");
        let production_key = var("MIDTRANS_PRODUCTION_SERVER_KEY");
        match mode {
            GatewayMode::Sandbox if sandbox_key.is_none() => {
                anyhow::bail!("MIDTRANS_SANDBOX_SERVER_KEY environment variable is required")
            }
            GatewayMode::Production if production_key.is_none() => {
                anyhow::bail!("MIDTRANS_PRODUCTION_SERVER_KEY environment variable is required")
            }
            _ => {}
        }

        let mut sandbox = GatewayEndpoints::sandbox(sandbox_key.unwrap_or_default());
        if let Some(url) = var("MIDTRANS_SANDBOX_SNAP_URL") {
            sandbox.snap_url = url;
        }
        if let Some(url) = var("MIDTRANS_SANDBOX_STATUS_URL") {
            sandbox.status_base_url = url;
        }
        let mut production = GatewayEndpoints::production(production_key.unwrap_or_default());
        if let Some(url) = var("MIDTRANS_PRODUCTION_SNAP_URL") {
            production.snap_url = url;
        }
        if let Some(url) = var("MIDTRANS_PRODUCTION_STATUS_URL") {
            production.status_base_url = url;
        }

        let gateway = GatewayConfig {
            mode,
            sandbox,
            production,
            timeout: Duration::from_secs(parse_or(&var, "GATEWAY_TIMEOUT_SECONDS", 10)?),
        };

        // Portal
        let mut portal = PortalConfig::new(
            SecretKey::new(required("SECRET_TOKEN_KEY")?),
            required("DEFAULT_DST")?,
            required("PAYMENT_CALLBACK_URL")?,
            required("LOGIN_REDIRECT_BASE")?,
        );

        if let Some(amount) = var("DEFAULT_AMOUNT") {
            let amount: i64 = amount
                .trim()
                .parse()
                .with_context(|| format!("DEFAULT_AMOUNT is not an integer: {amount:?}"))?;
            portal.base_price = Money::new(amount)?;
        }
        if let Some(vat) = var("COUNTRY_VAT") {
            portal.vat = VatRate::from_percent_str(&vat)?;
        }
        if let Some(methods) = var("ALLOWED_METHODS") {
            portal.allowed_methods = parse_methods(&methods)?;
        }
        if let Some(method) = var("DEFAULT_METHOD") {
            portal.default_method = method.trim().parse()?;
        }
        portal.session_validity_secs = parse_or(&var, "TOKEN_VALIDITY_SECONDS", 60)?;
        portal.preauth_window_secs = parse_or(&var, "PREAUTH_WINDOW_SECONDS", 10)?;
        portal.trust_callback_status = parse_or(&var, "TRUST_CALLBACK_STATUS", true)?;

        if !portal.is_method_allowed(&portal.default_method) {
            tracing::warn!(
                method = %portal.default_method.as_str(),
                "DEFAULT_METHOD is not in ALLOWED_METHODS; requests without a method will be rejected"
            );
        }

        Ok(Self {
            port,
            requests_per_minute,
            portal,
            gateway,
        })
    }
}

fn parse_or<T, V>(var: &V, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key} {raw:?}: {e}")),
        None => Ok(default),
    }
}

fn parse_methods(csv: &str) -> anyhow::Result<Vec<PaymentMethod>> {
    let methods = csv
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| code.parse::<PaymentMethod>())
        .collect::<Result<Vec<_>, _>>()?;

    if methods.is_empty() {
        anyhow::bail!("ALLOWED_METHODS must list at least one method");
    }
    Ok(methods)
}
