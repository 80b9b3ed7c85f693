/// OCPI version 2.2.1 types
pub mod v221;

#[cfg(feature = "ocpi-v211")]
/// OCPI version 2.1.1 types
pub mod v211;

use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

use crate::types::number::Number;

pub use v221::{cdr, tariff};

/// The OCPI protocol version a calculation follows.
///
/// The versions disagree on how step sizes are applied: 2.1.1 rounds the volume of every
/// charging period on its own, 2.2.1 rounds the total volume of the session once. Under 2.1.1
/// a duration restriction bounds the kind of time its element prices, under 2.2.1 the time
/// elapsed since the session started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    /// OCPI 2.1.1
    V211,
    /// OCPI 2.2.1
    #[default]
    V221,
}

/// A rounding instruction attached to a 2.1.1 price component by Gireve roaming partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rounding {
    /// Number of decimals to round to.
    pub round_granularity: RoundingGranularity,
    /// Direction to round in.
    pub round_rule: RoundingRule,
}

impl Rounding {
    /// Default rounding of a priced amount: to the nearest thousandth.
    pub const PRICE: Self = Self {
        round_granularity: RoundingGranularity::Thousandth,
        round_rule: RoundingRule::RoundNear,
    };

    /// Default rounding of a number of steps: up to a whole step.
    pub const STEP: Self = Self {
        round_granularity: RoundingGranularity::Unit,
        round_rule: RoundingRule::RoundUp,
    };

    pub(crate) fn apply(self, value: Number) -> Number {
        let decimals = match self.round_granularity {
            RoundingGranularity::Unit => 0,
            RoundingGranularity::Tenth => 1,
            RoundingGranularity::Hundredth => 2,
            RoundingGranularity::Thousandth => 3,
        };

        let strategy = match self.round_rule {
            RoundingRule::RoundUp => RoundingStrategy::ToPositiveInfinity,
            RoundingRule::RoundDown => RoundingStrategy::ToNegativeInfinity,
            RoundingRule::RoundNear => RoundingStrategy::MidpointAwayFromZero,
        };

        value.round_dp_with_strategy(decimals, strategy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingGranularity {
    Unit,
    Tenth,
    Hundredth,
    Thousandth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingRule {
    RoundUp,
    RoundDown,
    RoundNear,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{Rounding, RoundingGranularity, RoundingRule};
    use crate::types::number::Number;

    fn round(
        value: rust_decimal::Decimal,
        granularity: RoundingGranularity,
        rule: RoundingRule,
    ) -> Number {
        Rounding {
            round_granularity: granularity,
            round_rule: rule,
        }
        .apply(value.into())
    }

    #[test]
    fn rounding_follows_granularity_and_rule() {
        use RoundingGranularity::{Hundredth, Tenth, Thousandth, Unit};
        use RoundingRule::{RoundDown, RoundNear, RoundUp};

        assert_eq!(round(dec!(2.01), Unit, RoundUp), dec!(3).into());
        assert_eq!(round(dec!(2.99), Unit, RoundDown), dec!(2).into());
        assert_eq!(round(dec!(1.25), Tenth, RoundNear), dec!(1.3).into());
        assert_eq!(round(dec!(1.234), Hundredth, RoundDown), dec!(1.23).into());
        assert_eq!(round(dec!(0.83333), Thousandth, RoundNear), dec!(0.833).into());
    }

    #[test]
    fn gireve_rounding_deserializes() {
        let rounding: Rounding = serde_json::from_str(
            r#"{ "round_granularity": "HUNDREDTH", "round_rule": "ROUND_DOWN" }"#,
        )
        .unwrap();

        assert_eq!(rounding.round_granularity, RoundingGranularity::Hundredth);
        assert_eq!(rounding.round_rule, RoundingRule::RoundDown);
        assert_eq!(Rounding::STEP.apply(dec!(1.2).into()), dec!(2).into());
    }
}
