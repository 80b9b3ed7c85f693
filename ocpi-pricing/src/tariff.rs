use serde::Serialize;

use crate::{
    ocpi::{
        tariff::{OcpiPriceComponent, OcpiTariff, OcpiTariffElement, TariffDimensionType},
        Rounding, Version,
    },
    restriction::{collect_restrictions, Elapsed, Restriction},
    session::ChargePeriod,
    types::{
        money::{Money, Vat},
        time::DateTime,
    },
    Error, Result, Warning,
};

/// Find the first tariff that is active at `start_time`.
pub(crate) fn active_tariff(
    tariffs: &[OcpiTariff],
    start_time: DateTime,
) -> Option<(usize, &OcpiTariff)> {
    tariffs
        .iter()
        .enumerate()
        .find(|(_, tariff)| is_active(tariff, start_time))
}

fn is_active(tariff: &OcpiTariff, start_time: DateTime) -> bool {
    let is_after_start = tariff
        .start_date_time
        .map(|s| start_time >= s)
        .unwrap_or(true);
    let is_before_end = tariff.end_date_time.map(|s| start_time < s).unwrap_or(true);

    is_after_start && is_before_end
}

pub(crate) struct Tariff {
    pub id: String,
    pub currency: String,
    elements: Vec<TariffElement>,
}

impl Tariff {
    pub fn new(tariff: &OcpiTariff, version: Version) -> Result<Self> {
        if tariff.elements.is_empty() {
            return Err(Error::NoApplicableTariff);
        }

        let elements = tariff
            .elements
            .iter()
            .enumerate()
            .map(|(index, element)| TariffElement::new(element, index, tariff.vat, version))
            .collect();

        Ok(Self {
            id: tariff.id.clone(),
            currency: tariff.currency.clone(),
            elements,
        })
    }

    /// The index of the first element, in declaration order, that is active at the start of
    /// `period`.
    pub fn active_element(&self, period: &ChargePeriod) -> Option<usize> {
        self.elements
            .iter()
            .position(|element| element.is_active(period))
    }

    /// Collect, per dimension, the component of the first element active at the start of `period`
    /// that prices the dimension.
    pub fn active_components(
        &self,
        period_index: usize,
        period: &ChargePeriod,
        warnings: &mut Vec<Warning>,
    ) -> PriceComponents {
        let mut components = PriceComponents::new();
        let mut partial_validity = false;

        for tariff_element in &self.elements {
            let is_active_at_start = tariff_element.is_active(period);
            let is_active_at_end = tariff_element.is_active_at_end(period);

            if is_active_at_start != is_active_at_end {
                partial_validity = true;
            }

            if !is_active_at_start {
                continue;
            }

            if components.time.is_none() {
                components.time = tariff_element.components.time;
            }

            if components.parking.is_none() {
                components.parking = tariff_element.components.parking;
            }

            if components.energy.is_none() {
                components.energy = tariff_element.components.energy;
            }

            if components.flat.is_none() {
                components.flat = tariff_element.components.flat;
            }

            if let Some(session_time) = tariff_element.session_time {
                if components.time.is_none() && components.parking.is_none() {
                    components.time = Some(session_time);
                    components.parking = Some(session_time);
                }
            }

            if components.has_all_components() {
                break;
            }
        }

        if partial_validity {
            warnings.push(Warning::PartialElementValidity { period_index });
        }

        components
    }
}

struct TariffElement {
    restrictions: Vec<Restriction>,
    components: PriceComponents,
    /// Prices both time and parking, when no earlier element prices either.
    session_time: Option<PriceComponent>,
}

impl TariffElement {
    fn new(
        ocpi_element: &OcpiTariffElement,
        element_index: usize,
        tariff_vat: Option<Vat>,
        version: Version,
    ) -> Self {
        let restrictions = if let Some(restrictions) = &ocpi_element.restrictions {
            collect_restrictions(restrictions, &duration_bounds(ocpi_element, version))
        } else {
            Vec::new()
        };

        let mut components = PriceComponents::new();
        let mut session_time = None;

        for ocpi_component in &ocpi_element.price_components {
            let price_component = PriceComponent::new(ocpi_component, element_index, tariff_vat);

            match ocpi_component.component_type {
                TariffDimensionType::Flat => components.flat.get_or_insert(price_component),
                TariffDimensionType::Time => components.time.get_or_insert(price_component),
                TariffDimensionType::ParkingTime => {
                    components.parking.get_or_insert(price_component)
                }
                TariffDimensionType::Energy => components.energy.get_or_insert(price_component),
                TariffDimensionType::SessionTime => session_time.get_or_insert(price_component),
            };
        }

        Self {
            restrictions,
            components,
            session_time,
        }
    }

    fn is_active(&self, period: &ChargePeriod) -> bool {
        self.restrictions.iter().all(|restriction| {
            restriction.instant_validity_exclusive(&period.start_instant)
                && restriction.period_validity(&period.period_data)
        })
    }

    fn is_active_at_end(&self, period: &ChargePeriod) -> bool {
        self.restrictions
            .iter()
            .all(|restriction| restriction.instant_validity_inclusive(&period.end_instant))
    }
}

/// The kinds of elapsed time the duration bounds of `element` apply to.
///
/// OCPI 2.1.1 bounds the time an element prices: charging time for TIME, parking time for
/// PARKING_TIME and both together for SESSION_TIME. An element pricing none of those has no duration
/// bounds. OCPI 2.2.1 bounds the time since the start of the session.
fn duration_bounds(element: &OcpiTariffElement, version: Version) -> Vec<Elapsed> {
    match version {
        Version::V221 => vec![Elapsed::Session],
        Version::V211 => {
            let mut bounds = Vec::new();

            for component in &element.price_components {
                let elapsed = match component.component_type {
                    TariffDimensionType::Time => Elapsed::Charging,
                    TariffDimensionType::ParkingTime => Elapsed::Parking,
                    TariffDimensionType::SessionTime => Elapsed::ChargingAndParking,
                    TariffDimensionType::Energy | TariffDimensionType::Flat => continue,
                };

                if !bounds.contains(&elapsed) {
                    bounds.push(elapsed);
                }
            }

            bounds
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PriceComponents {
    pub flat: Option<PriceComponent>,
    pub energy: Option<PriceComponent>,
    pub parking: Option<PriceComponent>,
    pub time: Option<PriceComponent>,
}

impl PriceComponents {
    fn new() -> Self {
        Self::default()
    }

    pub fn has_all_components(&self) -> bool {
        self.flat.is_some()
            && self.energy.is_some()
            && self.parking.is_some()
            && self.time.is_some()
    }
}

/// A price component of the tariff element it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceComponent {
    /// Index of the tariff element this component is part of.
    pub tariff_element_index: usize,
    /// Price per unit excluding VAT.
    pub price: Money,
    /// VAT percentage of the component, or of the tariff when the component has none.
    pub vat: Option<Vat>,
    /// Step size in Wh for energy and in seconds for (parking) time.
    pub step_size: u64,
    /// Rounding of the cost of every period priced with this component.
    pub price_round: Option<Rounding>,
    /// Rounding of the number of steps billed.
    pub step_round: Rounding,
}

impl PriceComponent {
    fn new(
        component: &OcpiPriceComponent,
        tariff_element_index: usize,
        tariff_vat: Option<Vat>,
    ) -> Self {
        let &OcpiPriceComponent {
            price,
            vat,
            step_size,
            price_round,
            step_round,
            ..
        } = component;

        Self {
            tariff_element_index,
            price,
            vat: vat.or(tariff_vat),
            step_size,
            price_round,
            step_round: step_round.unwrap_or(Rounding::STEP),
        }
    }
}
