use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tariff::OcpiTariff;
use crate::{
    null_default,
    ocpi::v221,
    types::{
        electricity::{Ampere, Kwh},
        money::{Money, Price},
        time::{DateTime, HoursDecimal},
    },
};

/// The CDR object describes the Charging Session and its costs. How these costs are build up etc.
#[derive(Clone, Deserialize, Serialize)]
pub struct Cdr {
    /// Uniquely identifies the CDR within the CPO's platform.
    #[serde(default)]
    pub id: String,

    /// Start timestamp of the charging session.
    pub start_date_time: DateTime,

    /// Stop timestamp of the charging session.
    pub stop_date_time: DateTime,

    /// Currency of the CDR in ISO 4217 Code.
    pub currency: String,

    /// List of relevant tariff elements.
    #[serde(deserialize_with = "null_default", default)]
    pub tariffs: Vec<OcpiTariff>,

    /// Describes the location that the charge-session took place at.
    pub location: OcpiLocation,

    /// List of charging periods that make up this charging session. A session should consist of 1 or
    /// more periods, where each period has a different relevant Tariff.
    pub charging_periods: Vec<OcpiChargingPeriod>,

    /// Total cost of this transaction.
    pub total_cost: Money,

    /// Total energy charged, in kWh.
    pub total_energy: Kwh,

    /// Total time charging, in hours
    pub total_time: HoursDecimal,

    /// Total time not charging, in hours
    #[serde(default)]
    pub total_parking_time: Option<HoursDecimal>,

    /// Timestamp when this CDR was last updated
    pub last_updated: DateTime,
}

/// The part of an OCPI 2.1.1 location that is relevant for pricing.
#[derive(Clone, Deserialize, Serialize)]
pub struct OcpiLocation {
    /// ISO 3166-1 alpha-3 code for the country of this location.
    pub country: String,
    /// IANA time-zone of this location, for example `Europe/Oslo`.
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// The volume that has been consumed for a specific dimension during a charging period.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "type", content = "volume")]
pub enum OcpiCdrDimension {
    /// Consumed energy in `kWh`.
    Energy(Kwh),
    /// Flat fee, no unit.
    Flat(Decimal),
    /// The peak current, in 'A', during this period.
    MaxCurrent(Ampere),
    /// The lowest current, in `A`, during this period.
    MinCurrent(Ampere),
    /// The parking time, in hours, consumed in this period.
    ParkingTime(HoursDecimal),
    /// The charging time, in hours, consumed in this period.
    Time(HoursDecimal),
}

/// A single charging period, containing a non empty list of charge dimensions.
#[derive(Clone, Deserialize, Serialize)]
pub struct OcpiChargingPeriod {
    /// Start timestamp of the charging period. This period ends when a next period starts, the
    /// last period ends when the session ends
    pub start_date_time: DateTime,

    /// List of relevant values for this charging period
    pub dimensions: Vec<OcpiCdrDimension>,
}

impl From<Cdr> for v221::cdr::Cdr {
    fn from(cdr: Cdr) -> Self {
        Self {
            id: cdr.id,
            start_date_time: cdr.start_date_time,
            end_date_time: cdr.stop_date_time,
            currency: cdr.currency,
            tariffs: cdr.tariffs.into_iter().map(OcpiTariff::into).collect(),
            cdr_location: v221::cdr::OcpiCdrLocation {
                country: cdr.location.country,
                time_zone: cdr.location.time_zone,
            },
            charging_periods: cdr
                .charging_periods
                .into_iter()
                .map(OcpiChargingPeriod::into)
                .collect(),
            total_cost: Some(Price {
                excl_vat: cdr.total_cost,
                incl_vat: None,
            }),
            total_fixed_cost: None,
            total_energy: cdr.total_energy,
            total_energy_cost: None,
            total_time: cdr.total_time,
            total_time_cost: None,
            total_parking_time: cdr.total_parking_time,
            total_parking_cost: None,
            last_updated: cdr.last_updated,
        }
    }
}

impl From<OcpiChargingPeriod> for v221::cdr::OcpiChargingPeriod {
    fn from(period: OcpiChargingPeriod) -> Self {
        Self {
            start_date_time: period.start_date_time,
            dimensions: period
                .dimensions
                .into_iter()
                .filter_map(OcpiCdrDimension::into_v221)
                .collect(),
            tariff_id: None,
        }
    }
}

impl OcpiCdrDimension {
    /// The 2.2.1 counterpart of this dimension, a `FLAT` dimension has none.
    fn into_v221(self) -> Option<v221::cdr::OcpiCdrDimension> {
        use v221::cdr::OcpiCdrDimension as V221;

        let dimension = match self {
            Self::Energy(volume) => V221::Energy(volume),
            Self::Flat(_) => return None,
            Self::MaxCurrent(volume) => V221::MaxCurrent(volume),
            Self::MinCurrent(volume) => V221::MinCurrent(volume),
            Self::ParkingTime(volume) => V221::ParkingTime(volume),
            Self::Time(volume) => V221::Time(volume),
        };

        Some(dimension)
    }
}
