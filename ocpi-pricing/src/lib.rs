//! # OCPI Pricing library
//!
//! Functionality to calculate the (sub)totals of a charge session. Use [`calculate`] to price a
//! CDR with a tariff, or the [`pricer::Pricer`] to configure the calculation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// OCPI specific structures for defining tariffs and charge sessions.
pub mod ocpi;

/// Module containing the functionality to price charge sessions with provided tariffs.
pub mod pricer;

/// Rounding of volumes to step sizes.
pub mod step_size;

/// Resolving the local time of a charge session.
pub mod time_zone;

mod restriction;
mod session;
mod tariff;

/// OCPI specific numeric types used for calculations, serializing and deserializing.
pub mod types;

use ocpi::{
    cdr::{Cdr, CdrDimensionType},
    tariff::OcpiTariff,
};
use pricer::{Pricer, Report};
use types::{electricity::Kwh, time::HoursDecimal};

/// Result of pricing a charge session.
pub type Result<T> = std::result::Result<T, Error>;

/// Possible errors when pricing a charge session.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The charging periods of the CDR cannot be priced.
    #[error("invalid usage data: {0}")]
    InvalidUsageData(#[from] UsageDataError),
    /// The tariff does not contain any elements.
    #[error("the tariff does not contain any elements")]
    NoApplicableTariff,
    /// No valid tariff has been found in the list of provided tariffs.
    ///
    /// A valid tariff must have a start date time before the start of the session and a end date
    /// time after the start of the session.
    ///
    /// If the session does not contain any tariffs consider providing a list of tariffs using
    /// [`pricer::Pricer::with_tariffs`].
    #[error("no valid tariff has been found in the list of provided tariffs")]
    NoValidTariff,
    /// A numeric overflow occurred during tariff calculation, for example because of a negative
    /// step size.
    #[error("a numeric overflow occurred during tariff calculation")]
    RoundingOverflow,
}

impl From<rust_decimal::Error> for Error {
    fn from(_: rust_decimal::Error) -> Self {
        Self::RoundingOverflow
    }
}

/// The reason the charging periods of a CDR cannot be priced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageDataError {
    /// A dimension of a period has a volume below zero.
    #[error("period {period_index} has a negative {dimension:?} volume")]
    NegativeVolume {
        period_index: usize,
        dimension: CdrDimensionType,
    },
    /// A period starts before the period preceding it.
    #[error("period {period_index} starts before the period preceding it")]
    PeriodsOutOfOrder { period_index: usize },
    /// The session ends before the last period starts.
    #[error("the session ends before period {period_index} starts")]
    SessionEndsBeforePeriod { period_index: usize },
}

/// A condition that did not prevent pricing a session, but might make the price differ from what
/// is expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// No time-zone is known for the country of the CDR location, UTC was used instead.
    UnresolvedTimeZone { country: String },
    /// The time-zone of the CDR location is not a valid IANA time-zone.
    InvalidTimeZone { time_zone: String },
    /// A tariff element became active or inactive in the middle of a period.
    PartialElementValidity { period_index: usize },
    /// The CDR and the tariff use different currencies.
    CurrencyMismatch { cdr: String, tariff: String },
    /// The total energy of the CDR differs from the sum of its periods.
    TotalEnergyMismatch { reported: Kwh, calculated: Kwh },
    /// The total time of the CDR differs from the duration of its periods.
    TotalTimeMismatch {
        reported: HoursDecimal,
        calculated: HoursDecimal,
    },
    /// The total parking time of the CDR differs from the sum of its periods.
    TotalParkingTimeMismatch {
        reported: HoursDecimal,
        calculated: HoursDecimal,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedTimeZone { country } => {
                write!(f, "no time-zone found for country `{country}`, using UTC")
            }
            Self::InvalidTimeZone { time_zone } => {
                write!(f, "`{time_zone}` is not a valid time-zone")
            }
            Self::PartialElementValidity { period_index } => write!(
                f,
                "the active tariff elements change during period {period_index}"
            ),
            Self::CurrencyMismatch { cdr, tariff } => write!(
                f,
                "the CDR is in `{cdr}` but the tariff is in `{tariff}`"
            ),
            Self::TotalEnergyMismatch {
                reported,
                calculated,
            } => write!(
                f,
                "total energy of {reported} kWh differs from calculated {calculated} kWh"
            ),
            Self::TotalTimeMismatch {
                reported,
                calculated,
            } => write!(
                f,
                "total time of {reported} differs from calculated {calculated}"
            ),
            Self::TotalParkingTimeMismatch {
                reported,
                calculated,
            } => write!(
                f,
                "total parking time of {reported} differs from calculated {calculated}"
            ),
        }
    }
}

/// Price `cdr` with `tariff`, applying step sizes the OCPI 2.2.1 way.
///
/// Time based restrictions are evaluated in the time-zone of the CDR location or, when it has
/// none, the time-zone detected from its country.
pub fn calculate(cdr: &Cdr, tariff: &OcpiTariff) -> Result<Report> {
    Pricer::with_tariffs(cdr, std::slice::from_ref(tariff)).build_report()
}

/// Price an OCPI 2.1.1 `cdr` with an OCPI 2.1.1 `tariff`, applying step sizes to every period.
///
/// Returns the total cost excluding VAT, OCPI 2.1.1 has no notion of VAT.
#[cfg(feature = "ocpi-v211")]
pub fn calculate_legacy(
    cdr: &ocpi::v211::cdr::Cdr,
    tariff: &ocpi::v211::tariff::OcpiTariff,
) -> Result<types::money::Money> {
    let cdr = Cdr::from(cdr.clone());
    let tariff = OcpiTariff::from(tariff.clone());

    let report = Pricer::with_tariffs(&cdr, std::slice::from_ref(&tariff))
        .with_version(ocpi::Version::V211)
        .build_report()?;

    Ok(report.total_cost.excl_vat)
}

fn null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}
