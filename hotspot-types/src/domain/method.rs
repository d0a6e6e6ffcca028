//! Payment methods offered by the gateway and their fee policies.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use crate::error::DomainError;

/// A gateway payment channel, identified on the wire by its code
/// (e.g. `gopay`, `other_qris`, `bri_va`).
///
/// Codes the portal has no fee policy for are kept as `Other` so that an
/// operator can still allow them; they carry no fee and no VAT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentMethod {
    Gopay,
    Shopeepay,
    Akulaku,
    Kredivo,
    OtherQris,
    CreditCard,
    Echannel,
    BriVa,
    CimbVa,
    BniVa,
    PermataVa,
    OtherVa,
    Indomaret,
    Alfamart,
    Alfamidi,
    DanDan,
    Other(String),
}

/// How the gateway fee for a method is derived from the base amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeePolicy {
    /// A share of the base amount.
    Percentage { basis_points: u32 },
    /// A share of the base amount plus a fixed surcharge.
    PercentagePlusFlat { basis_points: u32, flat: i64 },
    /// A fixed amount regardless of the base.
    Flat(i64),
    Free,
}

impl FeePolicy {
    /// Computes the fee for the given base amount.
    pub fn apply(&self, base: Money) -> Money {
        match *self {
            FeePolicy::Percentage { basis_points } => base.apply_basis_points(basis_points),
            FeePolicy::PercentagePlusFlat { basis_points, flat } => {
                let share = base.apply_basis_points(basis_points).amount();
                Money::new(share.saturating_add(flat)).unwrap_or(Money::ZERO)
            }
            FeePolicy::Flat(amount) => Money::new(amount).unwrap_or(Money::ZERO),
            FeePolicy::Free => Money::ZERO,
        }
    }
}

impl PaymentMethod {
    /// Returns the gateway code for this method.
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Gopay => "gopay",
            PaymentMethod::Shopeepay => "shopeepay",
            PaymentMethod::Akulaku => "akulaku",
            PaymentMethod::Kredivo => "kredivo",
            PaymentMethod::OtherQris => "other_qris",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Echannel => "echannel",
            PaymentMethod::BriVa => "bri_va",
            PaymentMethod::CimbVa => "cimb_va",
            PaymentMethod::BniVa => "bni_va",
            PaymentMethod::PermataVa => "permata_va",
            PaymentMethod::OtherVa => "other_va",
            PaymentMethod::Indomaret => "indomaret",
            PaymentMethod::Alfamart => "alfamart",
            PaymentMethod::Alfamidi => "alfamidi",
            PaymentMethod::DanDan => "dan_dan",
            PaymentMethod::Other(code) => code,
        }
    }

    /// The fee table.
    pub fn fee_policy(&self) -> FeePolicy {
        match self {
            PaymentMethod::Gopay
            | PaymentMethod::Shopeepay
            | PaymentMethod::Akulaku
            | PaymentMethod::Kredivo => FeePolicy::Percentage { basis_points: 200 },
            PaymentMethod::OtherQris => FeePolicy::Percentage { basis_points: 70 },
            PaymentMethod::CreditCard => FeePolicy::PercentagePlusFlat {
                basis_points: 290,
                flat: 2_000,
            },
            PaymentMethod::Echannel
            | PaymentMethod::BriVa
            | PaymentMethod::CimbVa
            | PaymentMethod::BniVa
            | PaymentMethod::PermataVa
            | PaymentMethod::OtherVa => FeePolicy::Flat(4_000),
            PaymentMethod::Indomaret
            | PaymentMethod::Alfamart
            | PaymentMethod::Alfamidi
            | PaymentMethod::DanDan => FeePolicy::Flat(5_000),
            PaymentMethod::Other(_) => FeePolicy::Free,
        }
    }

    /// Whether country VAT is charged on top of the base amount.
    pub fn vat_applicable(&self) -> bool {
        matches!(
            self,
            PaymentMethod::CreditCard
                | PaymentMethod::Akulaku
                | PaymentMethod::Kredivo
                | PaymentMethod::Echannel
                | PaymentMethod::BriVa
                | PaymentMethod::CimbVa
                | PaymentMethod::BniVa
                | PaymentMethod::PermataVa
                | PaymentMethod::OtherVa
        )
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let method = match code {
            "" => return Err(DomainError::InvalidPaymentMethod(s.to_string())),
            "gopay" => PaymentMethod::Gopay,
            "shopeepay" => PaymentMethod::Shopeepay,
            "akulaku" => PaymentMethod::Akulaku,
            "kredivo" => PaymentMethod::Kredivo,
            "other_qris" => PaymentMethod::OtherQris,
            "credit_card" => PaymentMethod::CreditCard,
            "echannel" => PaymentMethod::Echannel,
            "bri_va" => PaymentMethod::BriVa,
            "cimb_va" => PaymentMethod::CimbVa,
            "bni_va" => PaymentMethod::BniVa,
            "permata_va" => PaymentMethod::PermataVa,
            "other_va" => PaymentMethod::OtherVa,
            "indomaret" => PaymentMethod::Indomaret,
            "alfamart" => PaymentMethod::Alfamart,
            "alfamidi" => PaymentMethod::Alfamidi,
            "dan_dan" => PaymentMethod::DanDan,
            other => PaymentMethod::Other(other.to_string()),
        };
        Ok(method)
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
