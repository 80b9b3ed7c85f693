use std::{
    fmt::Display,
    ops::{Add, Mul, Sub},
};

use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

/// Exact decimal used for every quantity and amount in a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub(crate) struct Number(rust_decimal::Decimal);

impl Number {
    pub(crate) fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub(crate) fn is_sign_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Round half away from zero to `dp` decimal places.
    pub(crate) fn round_dp(self, dp: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    pub(crate) fn round_dp_with_strategy(self, dp: u32, strategy: RoundingStrategy) -> Self {
        Self(self.0.round_dp_with_strategy(dp, strategy))
    }

    /// The number of decimal places this number was expressed with.
    pub(crate) fn scale(self) -> u32 {
        self.0.scale()
    }

    pub(crate) fn checked_div(self, other: Self) -> Option<Self> {
        self.0.checked_div(other.0).map(Self)
    }

    pub(crate) fn checked_mul(self, other: Self) -> Option<Self> {
        self.0.checked_mul(other.0).map(Self)
    }

    pub(crate) fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub(crate) fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub(crate) fn saturating_mul(self, other: Self) -> Self {
        Self(self.0.saturating_mul(other.0))
    }
}

impl From<rust_decimal::Decimal> for Number {
    fn from(value: rust_decimal::Decimal) -> Self {
        Self(value)
    }
}

impl From<Number> for rust_decimal::Decimal {
    fn from(value: Number) -> Self {
        value.0
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self(value.into())
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

impl TryFrom<Number> for i64 {
    type Error = rust_decimal::Error;

    fn try_from(value: Number) -> Result<Self, Self::Error> {
        value.0.try_into()
    }
}

impl Add for Number {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub for Number {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl Mul for Number {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.saturating_mul(rhs)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::Number;

    #[test]
    fn midpoint_rounds_away_from_zero() {
        assert_eq!(Number::from(dec!(0.125)).round_dp(2), Number::from(dec!(0.13)));
        assert_eq!(Number::from(dec!(0.135)).round_dp(2), Number::from(dec!(0.14)));
        assert_eq!(Number::from(dec!(0.1249)).round_dp(2), Number::from(dec!(0.12)));
    }

    #[test]
    fn negative_zero_is_not_negative() {
        assert!(!Number::from(dec!(-0.0)).is_sign_negative());
        assert!(Number::from(dec!(-0.01)).is_sign_negative());
    }
}
