use std::{fmt::Display, ops::Add};

use serde::{Deserialize, Serialize};

use super::{electricity::Kwh, number::Number, time::HoursDecimal};
use crate::ocpi::Rounding;

const MILLIS_IN_HOUR: i64 = 3_600_000;

/// A price consisting of a value excluding VAT and, when the VAT is known, a value including VAT.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Price {
    /// The price excluding VAT.
    pub excl_vat: Money,
    /// The price including VAT.
    ///
    /// Absent when no VAT percentage applies to (part of) the priced usage.
    #[serde(default)]
    pub incl_vat: Option<Money>,
}

impl Price {
    /// A zero price without a known VAT.
    pub fn zero() -> Self {
        Self {
            excl_vat: Money::zero(),
            incl_vat: None,
        }
    }

    /// Round both values to `decimals` decimal places.
    #[must_use]
    pub fn round_dp(self, decimals: u32) -> Self {
        Self {
            excl_vat: self.excl_vat.round_dp(decimals),
            incl_vat: self.incl_vat.map(|incl| incl.round_dp(decimals)),
        }
    }

    /// Saturating addition. The sum only includes VAT if both sides do.
    #[must_use]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self {
            excl_vat: self.excl_vat.saturating_add(rhs.excl_vat),
            incl_vat: self
                .incl_vat
                .zip(rhs.incl_vat)
                .map(|(lhs, rhs)| lhs.saturating_add(rhs)),
        }
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

/// A monetary amount, the currency is dependant on the specified tariff.
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Money(Number);

impl Money {
    pub(crate) fn zero() -> Self {
        Self(Number::default())
    }

    /// Round half away from zero to `decimals` decimal places.
    #[must_use]
    pub fn round_dp(self, decimals: u32) -> Self {
        Self(self.0.round_dp(decimals))
    }

    #[must_use]
    pub(crate) fn round_with(self, rounding: Rounding) -> Self {
        Self(rounding.apply(self.0))
    }

    /// Saturating addition
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Apply a VAT percentage to this amount.
    #[must_use]
    pub fn apply_vat(self, vat: Vat) -> Self {
        Self(self.0.saturating_mul(vat.factor()))
    }

    /// Cost of `energy` at this price per kWh.
    pub(crate) fn kwh_cost(self, energy: Kwh) -> Self {
        Self(self.0.saturating_mul(energy.into()))
    }

    /// Cost of `duration` at this price per hour.
    pub(crate) fn time_cost(self, duration: HoursDecimal) -> Self {
        let millis = Number::from(duration.num_milliseconds());
        let hours = millis
            .checked_div(Number::from(MILLIS_IN_HOUR))
            .unwrap_or_else(|| unreachable!("divisor is non-zero"));

        Self(self.0.saturating_mul(hours))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl From<rust_decimal::Decimal> for Money {
    fn from(value: rust_decimal::Decimal) -> Self {
        Self(value.into())
    }
}

impl From<Money> for rust_decimal::Decimal {
    fn from(value: Money) -> Self {
        value.0.into()
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// A VAT percentage.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Vat(Number);

impl Vat {
    /// The multiplier that turns an amount excluding VAT into one including VAT.
    fn factor(self) -> Number {
        let fraction = self
            .0
            .checked_div(Number::from(100_i64))
            .unwrap_or_else(|| unreachable!("divisor is non-zero"));

        fraction.saturating_add(Number::from(1_i64))
    }
}

impl From<rust_decimal::Decimal> for Vat {
    fn from(value: rust_decimal::Decimal) -> Self {
        Self(value.into())
    }
}

impl Display for Vat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The number of decimals of the minor unit of an ISO 4217 currency.
pub fn currency_decimals(currency: &str) -> u32 {
    match currency {
        "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF" | "UGX"
        | "UYI" | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,
        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
        _ => 2,
    }
}
