//! Whole-unit monetary amount.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::DomainError;

/// Non-negative amount in whole currency units.
///
/// The portal charges in a currency without fractional units, so every
/// fee, tax and total is an integer. Rates are applied in basis points to
/// keep the arithmetic exact.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new Money value.
    pub fn new(amount: i64) -> Result<Self, DomainError> {
        if amount < 0 {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self(amount))
    }

    /// Returns the amount in whole currency units.
    pub fn amount(&self) -> i64 {
        self.0
    }

    /// Checked addition - returns error on overflow.
    pub fn checked_add(&self, other: Money) -> Result<Money, DomainError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(DomainError::AmountOverflow)
    }

    /// Applies a rate expressed in basis points (1/100 of a percent),
    /// rounding half-up to the nearest whole unit.
    pub fn apply_basis_points(&self, basis_points: u32) -> Money {
        let scaled = i128::from(self.0) * i128::from(basis_points);
        let rounded = (scaled + 5_000) / 10_000;
        Money(i64::try_from(rounded).unwrap_or(i64::MAX))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
