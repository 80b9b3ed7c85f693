use std::fmt::Display;

use chrono::Duration;
use serde::{Deserialize, Serialize, Serializer};

use super::number::Number;
use crate::{ocpi::Rounding, Error, Result};

const SECS_IN_MIN: i64 = 60;
const MINS_IN_HOUR: i64 = 60;
const MILLIS_IN_SEC: i64 = 1000;
const REPORTED_HOURS_TOLERANCE_MILLIS: i64 = 1800;

/// A `chrono` UTC date time.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// A generic duration type that converts from and to a decimal amount of hours.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub struct HoursDecimal(Duration);

impl<'de> Deserialize<'de> for HoursDecimal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as DeError;

        let hours = Number::deserialize(deserializer)?;
        let duration = Self::from_hours_number(hours).map_err(DeError::custom)?;
        Ok(duration)
    }
}

impl Serialize for HoursDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let hours = self.as_num_hours_number();
        hours.serialize(serializer)
    }
}

impl Display for HoursDecimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let duration = self.0;
        let seconds = duration.num_seconds() % SECS_IN_MIN;
        let minutes = (duration.num_seconds() / SECS_IN_MIN) % MINS_IN_HOUR;
        let hours = duration.num_seconds() / (SECS_IN_MIN * MINS_IN_HOUR);

        write!(f, "{hours:0>2}:{minutes:0>2}:{seconds:0>2}")
    }
}

impl From<HoursDecimal> for Duration {
    fn from(value: HoursDecimal) -> Self {
        value.0
    }
}

impl From<Duration> for HoursDecimal {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

impl HoursDecimal {
    pub(crate) fn zero() -> Self {
        Self(Duration::zero())
    }

    pub(crate) fn num_milliseconds(&self) -> i64 {
        self.0.num_milliseconds()
    }

    pub(crate) fn is_negative(&self) -> bool {
        self.0 < Duration::zero()
    }

    pub(crate) fn as_num_seconds_number(&self) -> Number {
        Number::from(self.0.num_milliseconds())
            .checked_div(Number::from(MILLIS_IN_SEC))
            .unwrap_or_else(|| unreachable!("divisor is non-zero"))
    }

    /// Convert into decimal representation.
    #[must_use]
    pub fn as_num_hours_decimal(&self) -> rust_decimal::Decimal {
        self.as_num_hours_number().into()
    }

    pub(crate) fn as_num_hours_number(&self) -> Number {
        Number::from(self.0.num_milliseconds())
            .checked_div(Number::from(MILLIS_IN_SEC * SECS_IN_MIN * MINS_IN_HOUR))
            .unwrap_or_else(|| unreachable!("divisor is non-zero"))
    }

    pub(crate) fn from_seconds_number(seconds: Number) -> Result<Self> {
        let millis = seconds
            .checked_mul(Number::from(MILLIS_IN_SEC))
            .ok_or(Error::RoundingOverflow)?
            .round_dp(0);

        Ok(Self(
            Duration::try_milliseconds(millis.try_into()?).ok_or(Error::RoundingOverflow)?,
        ))
    }

    pub(crate) fn from_hours_number(hours: Number) -> Result<Self> {
        let millis = hours
            .checked_mul(Number::from(MILLIS_IN_SEC * SECS_IN_MIN * MINS_IN_HOUR))
            .ok_or(Error::RoundingOverflow)?
            .round_dp(0);

        Ok(Self(
            Duration::try_milliseconds(millis.try_into()?).ok_or(Error::RoundingOverflow)?,
        ))
    }

    /// Round to a number of steps of `step_size` seconds, the number of steps rounded by
    /// `step_round`.
    pub(crate) fn round_to_step(self, step_size: u64, step_round: Rounding) -> Result<Self> {
        let billed = crate::step_size::round_steps(
            self.as_num_seconds_number(),
            Number::from(step_size),
            step_round,
        )?;

        Self::from_seconds_number(billed)
    }

    /// Whether this duration equals `reported` within the rounding error of three decimal hours.
    pub(crate) fn matches_reported(self, reported: Self) -> bool {
        let difference = (self.0 - reported.0).num_milliseconds().abs();
        difference <= REPORTED_HOURS_TOLERANCE_MILLIS
    }

    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.checked_sub(&other.0).unwrap_or_else(Duration::zero))
    }

    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(
            self.0
                .checked_add(&other.0)
                .unwrap_or(Duration::MAX),
        )
    }
}

impl Default for HoursDecimal {
    fn default() -> Self {
        Self::zero()
    }
}

/// A generic duration type that converts from and to a integer amount of seconds.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SecondsRound(Duration);

impl<'de> Deserialize<'de> for SecondsRound {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as DeError;

        let seconds: i64 = u64::deserialize(deserializer)?
            .try_into()
            .map_err(|_| DeError::custom(Error::RoundingOverflow))?;

        let duration = Duration::try_seconds(seconds)
            .ok_or_else(|| DeError::custom(Error::RoundingOverflow))?;

        Ok(Self(duration))
    }
}

impl Serialize for SecondsRound {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let seconds = self.0.num_seconds();
        serializer.serialize_i64(seconds)
    }
}

impl From<SecondsRound> for Duration {
    fn from(value: SecondsRound) -> Self {
        value.0
    }
}

impl From<Duration> for SecondsRound {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

/// A OCPI specific local date, without a time.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct OcpiDate(chrono::NaiveDate);

impl<'de> Deserialize<'de> for OcpiDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as DeError;

        let s = <String as Deserialize>::deserialize(deserializer)?;
        let date = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(DeError::custom)?;

        Ok(Self(date))
    }
}

impl Serialize for OcpiDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0.format("%Y-%m-%d"))
    }
}

impl From<OcpiDate> for chrono::NaiveDate {
    fn from(value: OcpiDate) -> Self {
        value.0
    }
}

impl From<chrono::NaiveDate> for OcpiDate {
    fn from(value: chrono::NaiveDate) -> Self {
        Self(value)
    }
}

/// A OCPI specific local time, without a date.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub struct OcpiTime(chrono::NaiveTime);

impl<'de> Deserialize<'de> for OcpiTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as DeError;

        let s = <String as Deserialize>::deserialize(deserializer)?;
        let time = chrono::NaiveTime::parse_from_str(&s, "%H:%M").map_err(DeError::custom)?;

        Ok(Self(time))
    }
}

impl Serialize for OcpiTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0.format("%H:%M"))
    }
}

impl From<OcpiTime> for chrono::NaiveTime {
    fn from(value: OcpiTime) -> Self {
        value.0
    }
}

impl From<chrono::NaiveTime> for OcpiTime {
    fn from(value: chrono::NaiveTime) -> Self {
        Self(value)
    }
}

/// Days of the week.
#[derive(Debug, Copy, PartialEq, Eq, Clone, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl From<DayOfWeek> for chrono::Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => Self::Mon,
            DayOfWeek::Tuesday => Self::Tue,
            DayOfWeek::Wednesday => Self::Wed,
            DayOfWeek::Thursday => Self::Thu,
            DayOfWeek::Friday => Self::Fri,
            DayOfWeek::Saturday => Self::Sat,
            DayOfWeek::Sunday => Self::Sun,
        }
    }
}
