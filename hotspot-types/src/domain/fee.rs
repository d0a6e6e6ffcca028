//! Fee and VAT computation.
//!
//! Both functions are pure: the same base amount and method always give the
//! same result, so the amounts quoted when a payment is initiated can be
//! recomputed anywhere else without drift.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::method::PaymentMethod;
use super::money::Money;
use crate::error::DomainError;

/// Country VAT rate, stored in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VatRate {
    basis_points: u32,
}

impl VatRate {
    pub fn from_basis_points(basis_points: u32) -> Self {
        Self { basis_points }
    }

    /// Parses a decimal percentage such as `"11"` or `"7.5"`.
    pub fn from_percent_str(s: &str) -> Result<Self, DomainError> {
        let percent: f64 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidVatRate(s.to_string()))?;
        if !percent.is_finite() || percent < 0.0 || percent > 100.0 {
            return Err(DomainError::InvalidVatRate(s.to_string()));
        }
        Ok(Self {
            basis_points: (percent * 100.0).round() as u32,
        })
    }

    pub fn basis_points(&self) -> u32 {
        self.basis_points
    }
}

impl fmt::Display for VatRate {
    /// Formats as a percentage without trailing zeros (`11`, `7.5`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.basis_points / 100;
        let frac = self.basis_points % 100;
        match frac {
            0 => write!(f, "{}", whole),
            f2 if f2 % 10 == 0 => write!(f, "{}.{}", whole, f2 / 10),
            f2 => write!(f, "{}.{:02}", whole, f2),
        }
    }
}

/// Itemized charges for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Charges {
    pub base: Money,
    pub fee: Money,
    pub vat: Money,
    pub gross: Money,
}

/// Computes gateway fees and VAT from the fixed method table.
#[derive(Debug, Clone, Copy)]
pub struct FeeVatCalculator {
    vat: VatRate,
}

impl FeeVatCalculator {
    pub fn new(vat: VatRate) -> Self {
        Self { vat }
    }

    pub fn vat_rate(&self) -> VatRate {
        self.vat
    }

    /// Fee charged by the gateway for `method`; unknown methods are free.
    pub fn compute_fee(&self, base: Money, method: &PaymentMethod) -> Money {
        method.fee_policy().apply(base)
    }

    /// VAT on the base amount, only for methods on the VAT list.
    pub fn compute_vat(&self, base: Money, method: &PaymentMethod) -> Money {
        if !method.vat_applicable() {
            return Money::ZERO;
        }
        base.apply_basis_points(self.vat.basis_points)
    }

    /// Computes fee, VAT and the gross total `base + fee + vat`.
    pub fn charges(&self, base: Money, method: &PaymentMethod) -> Result<Charges, DomainError> {
        let fee = self.compute_fee(base, method);
        let vat = self.compute_vat(base, method);
        let gross = base.checked_add(fee)?.checked_add(vat)?;
        Ok(Charges {
            base,
            fee,
            vat,
            gross,
        })
    }
}
