//! OCPI 2.2.1 tariff records.

use serde::{Deserialize, Serialize};

use crate::{
    null_default,
    ocpi::Rounding,
    types::{
        electricity::{Ampere, Kw, Kwh},
        money::{Money, Vat},
        time::{DateTime, DayOfWeek, OcpiDate, OcpiTime, SecondsRound},
    },
};

/// A tariff as published by a charge point operator.
#[derive(Clone, Deserialize, Serialize)]
pub struct OcpiTariff {
    pub id: String,

    /// ISO 4217 currency code, also deciding the precision of every calculated cost.
    pub currency: String,

    /// VAT percentage for every price component that does not specify one itself.
    #[serde(default)]
    pub vat: Option<Vat>,

    /// Evaluated in order, the first active element wins.
    pub elements: Vec<OcpiTariffElement>,

    /// Not used for pricing.
    #[serde(default)]
    pub energy_mix: Option<OcpiEnergyMix>,

    /// Sessions starting before this instant are not priced with this tariff.
    #[serde(default)]
    pub start_date_time: Option<DateTime>,

    /// Sessions starting at or after this instant are not priced with this tariff.
    #[serde(default)]
    pub end_date_time: Option<DateTime>,

    pub last_updated: DateTime,
}

/// The price of one dimension within a tariff element.
#[derive(Clone, Deserialize, Serialize)]
pub struct OcpiPriceComponent {
    #[serde(rename = "type")]
    pub component_type: TariffDimensionType,

    /// Price per unit, excluding VAT.
    pub price: Money,

    /// VAT percentage, overriding the one of the tariff.
    #[serde(default)]
    pub vat: Option<Vat>,

    /// Volume is billed in whole multiples of this many Wh (energy) or seconds (time). With a
    /// step size of 300, six minutes of charging bill ten.
    pub step_size: u64,

    /// Rounding of every cost priced with this component. Only set on tariffs converted from
    /// OCPI 2.1.1.
    #[serde(skip)]
    pub price_round: Option<Rounding>,

    /// Rounding of the number of steps billed, whole steps rounded up when absent. Only set on
    /// tariffs converted from OCPI 2.1.1.
    #[serde(skip)]
    pub step_round: Option<Rounding>,
}

/// Price components that apply together, optionally only under restrictions.
#[derive(Clone, Deserialize, Serialize)]
pub struct OcpiTariffElement {
    pub price_components: Vec<OcpiPriceComponent>,

    /// Absent restrictions make the element always active.
    #[serde(default)]
    pub restrictions: Option<OcpiTariffRestriction>,
}

/// The dimension a price component prices.
#[derive(Debug, Copy, PartialEq, Eq, Clone, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TariffDimensionType {
    /// Price per kWh, step size in Wh.
    Energy,
    /// Price per session.
    Flat,
    /// Price per hour not charging, step size in seconds.
    ParkingTime,
    /// Price per hour charging, step size in seconds.
    Time,
    /// Price per hour charging or parking, step size in seconds. Only produced by converting an
    /// OCPI 2.1.1 tariff.
    #[serde(skip_deserializing)]
    SessionTime,
}

/// Bounds that must all hold for a tariff element to be active.
///
/// Time of day and dates are local to the charge location. Minimums are inclusive, maximums
/// exclusive.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct OcpiTariffRestriction {
    /// Time of day, `HH:MM`.
    pub start_time: Option<OcpiTime>,

    /// Time of day, `HH:MM`. Before `start_time` the window passes midnight, `00:00` is the end of
    /// the day.
    pub end_time: Option<OcpiTime>,

    pub start_date: Option<OcpiDate>,

    /// The element is not active on this date.
    pub end_date: Option<OcpiDate>,

    /// Energy charged in the session so far.
    pub min_kwh: Option<Kwh>,

    pub max_kwh: Option<Kwh>,

    /// Compared with the current reported for a period, if any.
    pub min_current: Option<Ampere>,

    pub max_current: Option<Ampere>,

    /// Compared with the power reported for a period, if any.
    pub min_power: Option<Kw>,

    pub max_power: Option<Kw>,

    /// Seconds since the start of the session.
    pub min_duration: Option<SecondsRound>,

    pub max_duration: Option<SecondsRound>,

    /// Empty means every day.
    #[serde(deserialize_with = "null_default", default)]
    pub day_of_week: Vec<DayOfWeek>,
}

/// Where the energy supplied with a tariff comes from.
#[derive(Clone, Deserialize, Serialize)]
pub struct OcpiEnergyMix {
    pub is_green_energy: bool,

    #[serde(default)]
    pub supplier_name: Option<String>,

    #[serde(default)]
    pub energy_product_name: Option<String>,
}
