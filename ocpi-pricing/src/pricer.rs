use crate::{
    ocpi::{cdr::Cdr, tariff::OcpiTariff, Version},
    session::{ChargePeriod, ChargeSession, PeriodData},
    step_size::StepSizeMode,
    tariff::{self, PriceComponents, Tariff},
    time_zone::{self, TimeZoneLookup, TimeZoneSource},
    types::{
        electricity::Kwh,
        money::{currency_decimals, Money, Price, Vat},
        time::{DateTime, HoursDecimal},
    },
    Error, Result, Warning,
};

use chrono_tz::Tz;
use serde::Serialize;

pub use crate::tariff::PriceComponent;

/// Pricer that encapsulates a single charge-session and a list of tariffs.
/// To run the pricer call `build_report`. The resulting report contains the totals, subtotals and a breakdown of the
/// calculation.
///
/// Either specify a `Cdr` containing a list of tariffs.
/// ```ignore
/// let report = Pricer::new(&cdr).build_report()?;
/// ```
///
/// Or provide both the `Cdr` and a slice of `OcpiTariff`'s.
/// ```ignore
/// let report = Pricer::with_tariffs(&cdr, &tariffs)
///     .with_time_zone(Tz::Europe__Amsterdam)
///     .build_report()?;
/// ```
pub struct Pricer<'a> {
    cdr: &'a Cdr,
    tariffs: &'a [OcpiTariff],
    version: Version,
    time_zone: TimeZoneSource<'a>,
}

impl<'a> Pricer<'a> {
    /// Instantiate the pricer with a `Cdr` that contains at least one tariff.
    pub fn new(cdr: &'a Cdr) -> Self {
        Self::with_tariffs(cdr, &cdr.tariffs)
    }

    /// Instantiate the pricer with a `Cdr` and a slice that contains at least one tariff.
    pub fn with_tariffs(cdr: &'a Cdr, tariffs: &'a [OcpiTariff]) -> Self {
        Self {
            cdr,
            tariffs,
            version: Version::default(),
            time_zone: TimeZoneSource::default(),
        }
    }

    /// Apply step sizes the way `version` of OCPI prescribes.
    #[must_use]
    pub fn with_version(self, version: Version) -> Self {
        Self { version, ..self }
    }

    /// Evaluate time based restrictions in `time_zone`, regardless of the CDR location.
    #[must_use]
    pub fn with_time_zone(self, time_zone: Tz) -> Self {
        Self {
            time_zone: TimeZoneSource::Fixed(time_zone),
            ..self
        }
    }

    /// Find the time-zone of a CDR location without one by looking up its country with `lookup`.
    #[must_use]
    pub fn with_time_zone_lookup(self, lookup: TimeZoneLookup<'a>) -> Self {
        Self {
            time_zone: TimeZoneSource::Lookup(lookup),
            ..self
        }
    }

    /// Attempt to apply the first found valid tariff the charge session and build a report
    /// containing the results.
    pub fn build_report(&self) -> Result<Report> {
        let cdr = self.cdr;
        let mut warnings = Vec::new();

        let (tariff_index, ocpi_tariff) =
            tariff::active_tariff(self.tariffs, cdr.start_date_time).ok_or(Error::NoValidTariff)?;
        let tariff = Tariff::new(ocpi_tariff, self.version)?;

        if tariff.currency != cdr.currency {
            warnings.push(Warning::CurrencyMismatch {
                cdr: cdr.currency.clone(),
                tariff: tariff.currency.clone(),
            });
        }

        let time_zone = time_zone::resolve(&cdr.cdr_location, self.time_zone, &mut warnings);
        let session = ChargeSession::new(cdr, time_zone)?;

        let mut periods = Vec::with_capacity(session.periods.len());
        let mut flat_charged = false;

        for (index, period) in session.periods.iter().enumerate() {
            let mut components = tariff.active_components(index, period, &mut warnings);
            let element = tariff.active_element(period);

            // The flat fee is charged once per session.
            if flat_charged {
                components.flat = None;
            } else {
                flat_charged = components.flat.is_some();
            }

            tracing::debug!(
                period = index,
                start = %period.start_instant.date_time,
                element = ?element,
                "pricing period"
            );

            let dimensions = Dimensions::new(components, &period.period_data);
            periods.push(PeriodReport::new(period, element, dimensions));
        }

        let billed = StepSizeMode::from(self.version).strategy()(&mut periods)?;

        let mut subtotals = Subtotals::default();

        for period in &periods {
            subtotals.add(&period.dimensions);
        }

        let decimals = currency_decimals(&tariff.currency);
        let total_fixed_cost = subtotals.flat.total(decimals);
        let total_energy_cost = subtotals.energy.total(decimals);
        let total_time_cost = subtotals.time.total(decimals);
        let total_parking_cost = subtotals.parking_time.total(decimals);

        let total_cost = [
            total_fixed_cost,
            total_energy_cost,
            total_time_cost,
            total_parking_cost,
        ]
        .into_iter()
        .flatten()
        .reduce(Price::saturating_add)
        .unwrap_or_else(Price::zero);

        let totals = session.periods.last().map(|last| &last.end_instant);

        // Elapsed since the session start, not since the first period.
        let total_time = totals
            .map(|t| HoursDecimal::from(t.total_duration))
            .unwrap_or_else(HoursDecimal::zero);
        let total_energy = totals.map(|t| t.total_energy).unwrap_or_else(Kwh::zero);
        let total_charging_time = totals
            .map(|t| t.total_charging_duration)
            .unwrap_or_else(HoursDecimal::zero);
        let total_parking_time = totals
            .map(|t| t.total_parking_duration)
            .unwrap_or_else(HoursDecimal::zero);

        if !total_energy.matches_reported(cdr.total_energy) {
            warnings.push(Warning::TotalEnergyMismatch {
                reported: cdr.total_energy,
                calculated: total_energy,
            });
        }

        if !total_time.matches_reported(cdr.total_time) {
            warnings.push(Warning::TotalTimeMismatch {
                reported: cdr.total_time,
                calculated: total_time,
            });
        }

        if let Some(reported) = cdr.total_parking_time {
            if !total_parking_time.matches_reported(reported) {
                warnings.push(Warning::TotalParkingTimeMismatch {
                    reported,
                    calculated: total_parking_time,
                });
            }
        }

        for warning in &warnings {
            tracing::warn!(cdr = %cdr.id, "{warning}");
        }

        let report = Report {
            periods,
            tariff_index,
            tariff_id: tariff.id,
            time_zone: time_zone.name().to_owned(),
            total_cost,
            total_fixed_cost,
            total_energy_cost,
            total_time_cost,
            total_parking_cost,
            total_time,
            total_charging_time,
            billed_charging_time: billed.charging_time,
            total_parking_time,
            billed_parking_time: billed.parking_time,
            total_energy,
            billed_energy: billed.energy,
            warnings,
        };

        Ok(report)
    }
}

/// The priced lines of every dimension in a session.
#[derive(Default)]
struct Subtotals {
    flat: Subtotal,
    energy: Subtotal,
    time: Subtotal,
    parking_time: Subtotal,
}

impl Subtotals {
    fn add(&mut self, dimensions: &Dimensions) {
        self.flat.lines.extend(dimensions.flat.line());
        self.energy.lines.extend(dimensions.energy.line());
        self.time.lines.extend(dimensions.time.line());
        self.parking_time.lines.extend(dimensions.parking_time.line());
    }
}

#[derive(Default)]
struct Subtotal {
    lines: Vec<(Money, Option<Vat>)>,
}

impl Subtotal {
    /// The sum of all lines rounded to `decimals`, `None` if nothing was priced.
    ///
    /// VAT is only included when every line has one. When every line has the same VAT it is
    /// applied to the rounded sum, otherwise to each line.
    fn total(&self, decimals: u32) -> Option<Price> {
        let (_, first_vat) = self.lines.first()?;

        let excl_vat = self
            .lines
            .iter()
            .fold(Money::zero(), |total, (cost, _)| total.saturating_add(*cost))
            .round_dp(decimals);

        let incl_vat = if self.lines.iter().all(|(_, vat)| vat == first_vat) {
            first_vat.map(|vat| excl_vat.apply_vat(vat).round_dp(decimals))
        } else {
            self.lines
                .iter()
                .try_fold(Money::zero(), |total, (cost, vat)| {
                    vat.map(|vat| total.saturating_add(cost.apply_vat(vat)))
                })
                .map(|incl_vat| incl_vat.round_dp(decimals))
        };

        Some(Price { excl_vat, incl_vat })
    }
}

/// Structure containing the charge session priced according to the specified tariff.
/// The fields prefixed `total` correspond to CDR fields with the same name.
#[derive(Serialize)]
pub struct Report {
    /// Charge session details per period.
    pub periods: Vec<PeriodReport>,
    /// Index of the tariff that was found to be active.
    pub tariff_index: usize,
    /// Id of the tariff that was found to be active.
    pub tariff_id: String,
    /// The time-zone time based restrictions were evaluated in.
    pub time_zone: String,
    /// Total sum of all the costs of this transaction in the specified currency.
    pub total_cost: Price,
    /// Total sum of all the fixed costs in the specified currency. The cost not depending on amount of time/energy used etc. Can contain costs like a start tariff.
    pub total_fixed_cost: Option<Price>,
    /// Total sum of all the cost of all the energy used, in the specified currency.
    pub total_energy_cost: Option<Price>,
    /// Total sum of all the cost related to duration of charging during this transaction, in the specified currency.
    pub total_time_cost: Option<Price>,
    /// Total sum of all the cost related to parking of this transaction, in the specified currency.
    pub total_parking_cost: Option<Price>,
    /// Total duration of the charging session (including the duration of charging and not charging), in hours.
    pub total_time: HoursDecimal,
    /// Total duration of the charging session (excluding not charging), in hours.
    pub total_charging_time: HoursDecimal,
    /// The total charging time after applying step-size.
    pub billed_charging_time: HoursDecimal,
    /// Total duration of the charging session where the EV was not charging (no energy was transferred between EVSE and EV), in hours.
    pub total_parking_time: HoursDecimal,
    /// The total parking time after applying step-size
    pub billed_parking_time: HoursDecimal,
    /// Total energy charged, in kWh.
    pub total_energy: Kwh,
    /// The total energy after applying step-size.
    pub billed_energy: Kwh,
    /// Conditions that did not prevent pricing the session but might affect the result.
    pub warnings: Vec<Warning>,
}

/// A report for a single period that occurred during a session.
#[derive(Clone, Serialize)]
pub struct PeriodReport {
    /// The start time of this period.
    pub start_date_time: DateTime,
    /// The end time of this period.
    pub end_date_time: DateTime,
    /// Index of the first tariff element that was active during this period.
    pub tariff_element_index: Option<usize>,
    /// A structure that contains results per dimension.
    pub dimensions: Dimensions,
}

impl PeriodReport {
    fn new(
        period: &ChargePeriod,
        tariff_element_index: Option<usize>,
        dimensions: Dimensions,
    ) -> Self {
        Self {
            start_date_time: period.start_instant.date_time,
            end_date_time: period.end_instant.date_time,
            tariff_element_index,
            dimensions,
        }
    }

    /// The total cost of all dimensions in this period, before rounding.
    pub fn cost(&self) -> Option<Price> {
        [
            self.dimensions.time.cost(),
            self.dimensions.parking_time.cost(),
            self.dimensions.flat.cost(),
            self.dimensions.energy.cost(),
        ]
        .into_iter()
        .fold(None, |accum, next| {
            if accum.is_none() && next.is_none() {
                None
            } else {
                Some(
                    accum
                        .unwrap_or_default()
                        .saturating_add(next.unwrap_or_default()),
                )
            }
        })
    }
}

/// A structure containing a report for each dimension.
#[derive(Clone, Serialize)]
pub struct Dimensions {
    /// The flat dimension.
    pub flat: DimensionReport<()>,
    /// The energy dimension.
    pub energy: DimensionReport<Kwh>,
    /// The time dimension.
    pub time: DimensionReport<HoursDecimal>,
    /// The parking time dimension.
    pub parking_time: DimensionReport<HoursDecimal>,
}

impl Dimensions {
    pub(crate) fn new(components: PriceComponents, data: &PeriodData) -> Self {
        Self {
            parking_time: DimensionReport::new(components.parking, data.parking_duration),
            time: DimensionReport::new(components.time, data.charging_duration),
            energy: DimensionReport::new(components.energy, data.energy),
            flat: DimensionReport::new(components.flat, Some(())),
        }
    }
}

#[derive(Clone, Serialize)]
/// A report for a single dimension during a single period.
pub struct DimensionReport<V> {
    /// The price component that was active during this period for this dimension.
    /// It could be that no price component was active during this period for this dimension in
    /// which case `price` is `None`.
    pub price: Option<PriceComponent>,
    /// The volume of this dimension during this period, as received in the provided charge detail record.
    /// It could be that no volume was provided during this period for this dimension in which case
    /// the `volume` is `None`.
    pub volume: Option<V>,
    /// This field contains the optional value of `volume` after a potential step size was applied.
    ///
    /// If no step-size was applied for this period, the volume is exactly equal to the `volume`
    /// field.
    pub billed_volume: Option<V>,
}

impl<V> DimensionReport<V>
where
    V: Copy,
{
    pub(crate) fn new(price_component: Option<PriceComponent>, volume: Option<V>) -> Self {
        Self {
            price: price_component,
            volume,
            billed_volume: volume,
        }
    }

    pub(crate) fn is_priced(&self) -> bool {
        self.price.is_some() && self.volume.is_some()
    }
}

impl<V: Dimension> DimensionReport<V> {
    /// The total cost of this dimension during a period, before rounding.
    pub fn cost(&self) -> Option<Price> {
        self.line().map(|(excl_vat, vat)| Price {
            excl_vat,
            incl_vat: vat.map(|vat| excl_vat.apply_vat(vat)),
        })
    }

    fn line(&self) -> Option<(Money, Option<Vat>)> {
        let (Some(volume), Some(price)) = (self.billed_volume, self.price) else {
            return None;
        };

        let cost = volume.cost(price.price);
        let cost = price
            .price_round
            .map_or(cost, |rounding| cost.round_with(rounding));

        Some((cost, price.vat))
    }
}

/// An OCPI tariff dimension
pub trait Dimension: Copy {
    /// The cost of this dimension at a certain price.
    fn cost(&self, price: Money) -> Money;
}

impl Dimension for Kwh {
    fn cost(&self, price: Money) -> Money {
        price.kwh_cost(*self)
    }
}

impl Dimension for () {
    fn cost(&self, price: Money) -> Money {
        price
    }
}

impl Dimension for HoursDecimal {
    fn cost(&self, price: Money) -> Money {
        price.time_cost(*self)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono_tz::Tz;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::{Pricer, Subtotal};
    use crate::{
        ocpi::{cdr::Cdr, tariff::OcpiTariff, Version},
        types::{
            money::{Money, Price, Vat},
            time::HoursDecimal,
        },
        Error, Warning,
    };

    fn tariff(elements: serde_json::Value) -> OcpiTariff {
        serde_json::from_value(json!({
            "id": "tariff",
            "currency": "EUR",
            "elements": elements,
            "last_updated": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn cdr(periods: serde_json::Value, total_energy: f64, total_time: f64) -> Cdr {
        serde_json::from_value(json!({
            "id": "cdr",
            "start_date_time": "2024-01-10T10:00:00Z",
            "end_date_time": "2024-01-10T12:00:00Z",
            "currency": "EUR",
            "cdr_location": { "country": "NLD" },
            "charging_periods": periods,
            "total_energy": total_energy,
            "total_time": total_time,
            "last_updated": "2024-01-10T12:00:00Z"
        }))
        .unwrap()
    }

    fn money(value: rust_decimal::Decimal) -> Money {
        Money::from(value)
    }

    #[test]
    fn unconditional_energy_is_priced_exactly() {
        let tariff = tariff(json!([
            { "price_components": [{ "type": "ENERGY", "price": 0.50, "step_size": 1000 }] }
        ]));
        let cdr = cdr(
            json!([{
                "start_date_time": "2024-01-10T10:00:00Z",
                "dimensions": [{ "type": "ENERGY", "volume": 10.0 }]
            }]),
            10.0,
            2.0,
        );

        let report = Pricer::with_tariffs(&cdr, &[tariff]).build_report().unwrap();

        assert_eq!(report.total_cost.excl_vat, money(dec!(5.00)));
        assert_eq!(report.total_cost.incl_vat, None);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn flat_fee_is_charged_once_per_session() {
        let tariff = tariff(json!([
            {
                "price_components": [
                    { "type": "FLAT", "price": 1.00, "step_size": 0 },
                    { "type": "ENERGY", "price": 0.25, "step_size": 1 }
                ]
            }
        ]));
        let cdr = cdr(
            json!([
                {
                    "start_date_time": "2024-01-10T10:00:00Z",
                    "dimensions": [{ "type": "ENERGY", "volume": 2.0 }]
                },
                {
                    "start_date_time": "2024-01-10T11:00:00Z",
                    "dimensions": [{ "type": "ENERGY", "volume": 2.0 }]
                }
            ]),
            4.0,
            2.0,
        );

        let report = Pricer::with_tariffs(&cdr, &[tariff]).build_report().unwrap();

        assert_eq!(
            report.total_fixed_cost.map(|cost| cost.excl_vat),
            Some(money(dec!(1.00)))
        );
        assert!(report.periods[1].dimensions.flat.price.is_none());
        assert_eq!(report.total_cost.excl_vat, money(dec!(2.00)));
    }

    #[test]
    fn duration_bound_splits_session_over_two_elements() {
        let tariff = tariff(json!([
            {
                "price_components": [{ "type": "TIME", "price": 2.00, "step_size": 1 }],
                "restrictions": { "max_duration": 3600 }
            },
            { "price_components": [{ "type": "TIME", "price": 4.00, "step_size": 1 }] }
        ]));
        let cdr = cdr(
            json!([
                {
                    "start_date_time": "2024-01-10T10:00:00Z",
                    "dimensions": [{ "type": "TIME", "volume": 1.0 }]
                },
                {
                    "start_date_time": "2024-01-10T11:00:00Z",
                    "dimensions": [{ "type": "TIME", "volume": 1.0 }]
                }
            ]),
            0.0,
            2.0,
        );

        let report = Pricer::with_tariffs(&cdr, &[tariff]).build_report().unwrap();

        assert_eq!(report.periods[0].tariff_element_index, Some(0));
        assert_eq!(report.periods[1].tariff_element_index, Some(1));
        assert_eq!(report.total_cost.excl_vat, money(dec!(6.00)));
    }

    #[test]
    fn session_rounding_bills_delta_at_price_after_switch() {
        let tariff = tariff(json!([
            {
                "price_components": [{ "type": "TIME", "price": 2.00, "step_size": 900 }],
                "restrictions": { "max_duration": 3600 }
            },
            { "price_components": [{ "type": "TIME", "price": 4.00, "step_size": 900 }] }
        ]));
        let cdr: Cdr = serde_json::from_value(json!({
            "id": "cdr",
            "start_date_time": "2024-01-10T10:00:00Z",
            "end_date_time": "2024-01-10T11:10:00Z",
            "currency": "EUR",
            "cdr_location": { "country": "NLD" },
            "charging_periods": [
                {
                    "start_date_time": "2024-01-10T10:00:00Z",
                    "dimensions": [{ "type": "ENERGY", "volume": 5.0 }]
                },
                {
                    "start_date_time": "2024-01-10T11:00:00Z",
                    "dimensions": [{ "type": "ENERGY", "volume": 1.0 }]
                }
            ],
            "total_energy": 6.0,
            "total_time": 1.167,
            "last_updated": "2024-01-10T11:10:00Z"
        }))
        .unwrap();

        let report = Pricer::with_tariffs(&cdr, &[tariff]).build_report().unwrap();

        // 70 minutes of charging bill 75, the extra 5 minutes at the price of the last period.
        assert_eq!(
            report.billed_charging_time,
            HoursDecimal::from(Duration::try_minutes(75).unwrap())
        );
        assert_eq!(
            report.periods[0].cost(),
            Some(Price {
                excl_vat: money(dec!(2.00)),
                incl_vat: None,
            })
        );
        assert_eq!(
            report.periods[1].cost().map(|cost| cost.excl_vat),
            Some(money(dec!(1.00)))
        );
        assert_eq!(report.total_cost.excl_vat, money(dec!(3.00)));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn total_time_is_measured_from_session_start() {
        let tariff = tariff(json!([
            { "price_components": [{ "type": "ENERGY", "price": 0.50, "step_size": 1 }] }
        ]));
        let cdr = cdr(
            json!([{
                "start_date_time": "2024-01-10T10:15:00Z",
                "dimensions": [{ "type": "ENERGY", "volume": 10.0 }]
            }]),
            10.0,
            2.0,
        );

        let report = Pricer::with_tariffs(&cdr, &[tariff]).build_report().unwrap();

        assert_eq!(
            report.total_time,
            HoursDecimal::from(Duration::try_hours(2).unwrap())
        );
        assert!(!report
            .warnings
            .iter()
            .any(|warning| matches!(warning, Warning::TotalTimeMismatch { .. })));
    }

    #[test]
    fn version_selects_step_size_mode() {
        let tariff = tariff(json!([
            { "price_components": [{ "type": "ENERGY", "price": 1.00, "step_size": 1000 }] }
        ]));
        let period = |start: &str| {
            json!({
                "start_date_time": start,
                "dimensions": [{ "type": "ENERGY", "volume": 0.4 }]
            })
        };
        let cdr = cdr(
            json!([
                period("2024-01-10T10:00:00Z"),
                period("2024-01-10T10:40:00Z"),
                period("2024-01-10T11:20:00Z")
            ]),
            1.2,
            2.0,
        );
        let tariffs = [tariff];

        let per_period = Pricer::with_tariffs(&cdr, &tariffs)
            .with_version(Version::V211)
            .build_report()
            .unwrap();
        let per_session = Pricer::with_tariffs(&cdr, &tariffs)
            .with_version(Version::V221)
            .build_report()
            .unwrap();

        assert_eq!(per_period.total_cost.excl_vat, money(dec!(3.00)));
        assert_eq!(per_session.total_cost.excl_vat, money(dec!(2.00)));
    }

    #[test]
    fn currency_and_totals_are_checked() {
        let mut tariff = tariff(json!([
            { "price_components": [{ "type": "ENERGY", "price": 0.50, "step_size": 1 }] }
        ]));
        tariff.currency = "USD".to_owned();

        let cdr = cdr(
            json!([{
                "start_date_time": "2024-01-10T10:00:00Z",
                "dimensions": [{ "type": "ENERGY", "volume": 10.0 }]
            }]),
            12.0,
            2.0,
        );

        let report = Pricer::with_tariffs(&cdr, &[tariff])
            .with_time_zone(Tz::Europe__Amsterdam)
            .build_report()
            .unwrap();

        assert!(report.warnings.contains(&Warning::CurrencyMismatch {
            cdr: "EUR".to_owned(),
            tariff: "USD".to_owned(),
        }));
        assert!(report
            .warnings
            .iter()
            .any(|warning| matches!(warning, Warning::TotalEnergyMismatch { .. })));
        assert_eq!(report.time_zone, "Europe/Amsterdam");
    }

    #[test]
    fn no_active_tariff_is_an_error() {
        let mut tariff = tariff(json!([
            { "price_components": [{ "type": "ENERGY", "price": 0.50, "step_size": 1 }] }
        ]));
        tariff.start_date_time = Some("2025-01-01T00:00:00Z".parse().unwrap());

        let cdr = cdr(json!([]), 0.0, 2.0);

        assert!(matches!(
            Pricer::with_tariffs(&cdr, &[tariff]).build_report(),
            Err(Error::NoValidTariff)
        ));
    }

    #[test]
    fn single_vat_rate_is_applied_to_rounded_subtotal() {
        let vat = Some(Vat::from(dec!(21)));
        let subtotal = Subtotal {
            lines: vec![(money(dec!(2.504)), vat), (money(dec!(2.5)), vat)],
        };

        let total = subtotal.total(2).unwrap();

        assert_eq!(total.excl_vat, money(dec!(5.00)));
        assert_eq!(total.incl_vat, Some(money(dec!(6.05))));
    }

    #[test]
    fn missing_vat_on_any_line_drops_incl_vat() {
        let subtotal = Subtotal {
            lines: vec![
                (money(dec!(1)), Some(Vat::from(dec!(21)))),
                (money(dec!(1)), None),
            ],
        };

        assert_eq!(
            subtotal.total(2),
            Some(Price {
                excl_vat: money(dec!(2.00)),
                incl_vat: None,
            })
        );
    }

    #[test]
    fn mixed_vat_rates_are_applied_per_line() {
        let subtotal = Subtotal {
            lines: vec![
                (money(dec!(1)), Some(Vat::from(dec!(21)))),
                (money(dec!(1)), Some(Vat::from(dec!(9)))),
            ],
        };

        let total = subtotal.total(2).unwrap();

        assert_eq!(total.incl_vat, Some(money(dec!(2.30))));
    }
}
