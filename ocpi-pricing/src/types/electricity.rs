use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::number::Number;
use crate::{ocpi::Rounding, Error, Result};

const WATT_HOURS_IN_KWH: i64 = 1000;

/// A value of kilo watt hours.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct Kwh(Number);

impl Kwh {
    pub(crate) fn zero() -> Self {
        Self(Number::default())
    }

    /// Saturating addition
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub(crate) fn is_negative(self) -> bool {
        self.0.is_sign_negative()
    }

    pub(crate) fn watt_hours(self) -> Number {
        self.0.saturating_mul(Number::from(WATT_HOURS_IN_KWH))
    }

    pub(crate) fn from_watt_hours(num: Number) -> Result<Self> {
        num.checked_div(Number::from(WATT_HOURS_IN_KWH))
            .map(Self)
            .ok_or(Error::RoundingOverflow)
    }

    /// Round to a number of steps of `step_size` watt hours, the number of steps rounded by
    /// `step_round`.
    pub(crate) fn round_to_step(self, step_size: u64, step_round: Rounding) -> Result<Self> {
        let billed =
            crate::step_size::round_steps(self.watt_hours(), Number::from(step_size), step_round)?;
        Self::from_watt_hours(billed)
    }

    /// Whether this value equals `reported` at the precision `reported` was expressed with.
    pub(crate) fn matches_reported(self, reported: Self) -> bool {
        self.0.round_dp(reported.0.scale()) == reported.0
    }
}

impl From<rust_decimal::Decimal> for Kwh {
    fn from(value: rust_decimal::Decimal) -> Self {
        Self(value.into())
    }
}

impl From<Kwh> for rust_decimal::Decimal {
    fn from(value: Kwh) -> Self {
        value.0.into()
    }
}

impl From<Kwh> for Number {
    fn from(value: Kwh) -> Self {
        value.0
    }
}

impl Display for Kwh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// A value of kilo watts.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Kw(Number);

impl Kw {
    pub(crate) fn is_negative(self) -> bool {
        self.0.is_sign_negative()
    }
}

impl From<rust_decimal::Decimal> for Kw {
    fn from(value: rust_decimal::Decimal) -> Self {
        Self(value.into())
    }
}

impl From<Kw> for rust_decimal::Decimal {
    fn from(value: Kw) -> Self {
        value.0.into()
    }
}

/// A value of amperes.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Ampere(Number);

impl Ampere {
    pub(crate) fn is_negative(self) -> bool {
        self.0.is_sign_negative()
    }
}

impl From<rust_decimal::Decimal> for Ampere {
    fn from(value: rust_decimal::Decimal) -> Self {
        Self(value.into())
    }
}

impl From<Ampere> for rust_decimal::Decimal {
    fn from(value: Ampere) -> Self {
        value.0.into()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::Kwh;
    use crate::ocpi::Rounding;

    #[test]
    fn rounds_up_in_watt_hour_steps() {
        let energy = Kwh::from(dec!(4.3)).saturating_add(Kwh::from(dec!(1.1)));
        assert_eq!(
            energy.round_to_step(500, Rounding::STEP).unwrap(),
            Kwh::from(dec!(5.5))
        );
    }

    #[test]
    fn reported_total_is_compared_at_its_own_precision() {
        let computed = Kwh::from(dec!(15.34249));
        assert!(computed.matches_reported(Kwh::from(dec!(15.342))));
        assert!(!computed.matches_reported(Kwh::from(dec!(15.4))));
    }
}
