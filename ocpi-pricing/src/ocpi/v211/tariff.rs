//! OCPI 2.1.1 tariff records, including the rounding extensions used by Gireve.

use serde::{Deserialize, Serialize};

use crate::{
    null_default,
    ocpi::{v221, Rounding},
    types::{
        electricity::{Kw, Kwh},
        money::Money,
        time::{DateTime, DayOfWeek, OcpiDate, OcpiTime, SecondsRound},
    },
};

/// A 2.1.1 tariff. It has no VAT and no validity window.
#[derive(Clone, Deserialize, Serialize)]
pub struct OcpiTariff {
    pub id: String,

    /// ISO 4217 currency code.
    pub currency: String,

    pub elements: Vec<OcpiTariffElement>,

    #[serde(default)]
    pub energy_mix: Option<v221::tariff::OcpiEnergyMix>,

    pub last_updated: DateTime,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OcpiPriceComponent {
    #[serde(rename = "type")]
    pub component_type: TariffDimensionType,

    pub price: Money,

    /// Wh for energy, seconds for time.
    pub step_size: u64,

    /// Rounding of the cost of every period, the nearest thousandth when absent.
    #[serde(default)]
    pub price_round: Option<Rounding>,

    /// Rounding of the number of steps, up to a whole step when absent.
    #[serde(default)]
    pub step_round: Option<Rounding>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OcpiTariffElement {
    pub price_components: Vec<OcpiPriceComponent>,

    #[serde(default)]
    pub restrictions: Option<OcpiTariffRestriction>,
}

#[derive(Debug, Copy, PartialEq, Eq, Clone, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TariffDimensionType {
    Energy,
    Flat,
    ParkingTime,
    Time,
    /// Charging and parking time at the same price, used when an element prices neither
    /// separately.
    SessionTime,
}

/// Like its 2.2.1 counterpart, without current bounds. A duration bound limits the charging
/// time, the parking time or both, depending on the dimensions its element prices.
#[derive(Clone, Deserialize, Serialize)]
pub struct OcpiTariffRestriction {
    pub start_time: Option<OcpiTime>,

    pub end_time: Option<OcpiTime>,

    pub start_date: Option<OcpiDate>,

    pub end_date: Option<OcpiDate>,

    pub min_kwh: Option<Kwh>,

    pub max_kwh: Option<Kwh>,

    pub min_power: Option<Kw>,

    pub max_power: Option<Kw>,

    /// Seconds.
    pub min_duration: Option<SecondsRound>,

    /// Seconds.
    pub max_duration: Option<SecondsRound>,

    #[serde(deserialize_with = "null_default", default)]
    pub day_of_week: Vec<DayOfWeek>,
}

impl From<OcpiTariff> for v221::tariff::OcpiTariff {
    fn from(tariff: OcpiTariff) -> Self {
        Self {
            id: tariff.id,
            currency: tariff.currency,
            vat: None,
            elements: tariff
                .elements
                .into_iter()
                .map(OcpiTariffElement::into)
                .collect(),
            energy_mix: tariff.energy_mix,
            start_date_time: None,
            end_date_time: None,
            last_updated: tariff.last_updated,
        }
    }
}

impl From<OcpiTariffRestriction> for v221::tariff::OcpiTariffRestriction {
    fn from(restriction: OcpiTariffRestriction) -> Self {
        Self {
            start_date: restriction.start_date,
            end_date: restriction.end_date,
            start_time: restriction.start_time,
            end_time: restriction.end_time,
            max_power: restriction.max_power,
            min_power: restriction.min_power,
            min_duration: restriction.min_duration,
            max_duration: restriction.max_duration,
            min_kwh: restriction.min_kwh,
            max_kwh: restriction.max_kwh,
            day_of_week: restriction.day_of_week,
            max_current: None,
            min_current: None,
        }
    }
}

impl From<TariffDimensionType> for v221::tariff::TariffDimensionType {
    fn from(ty: TariffDimensionType) -> Self {
        match ty {
            TariffDimensionType::Flat => Self::Flat,
            TariffDimensionType::Time => Self::Time,
            TariffDimensionType::Energy => Self::Energy,
            TariffDimensionType::ParkingTime => Self::ParkingTime,
            TariffDimensionType::SessionTime => Self::SessionTime,
        }
    }
}

impl From<OcpiTariffElement> for v221::tariff::OcpiTariffElement {
    fn from(element: OcpiTariffElement) -> Self {
        Self {
            restrictions: element.restrictions.map(OcpiTariffRestriction::into),
            price_components: element
                .price_components
                .into_iter()
                .map(OcpiPriceComponent::into)
                .collect(),
        }
    }
}

impl From<OcpiPriceComponent> for v221::tariff::OcpiPriceComponent {
    fn from(component: OcpiPriceComponent) -> Self {
        Self {
            component_type: TariffDimensionType::into(component.component_type),
            price: component.price,
            step_size: component.step_size,
            vat: None,
            price_round: Some(component.price_round.unwrap_or(Rounding::PRICE)),
            step_round: Some(component.step_round.unwrap_or(Rounding::STEP)),
        }
    }
}
