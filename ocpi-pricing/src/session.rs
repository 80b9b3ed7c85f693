use crate::{
    ocpi::cdr::{Cdr, OcpiCdrDimension, OcpiChargingPeriod},
    time_zone::LocalTime,
    types::{
        electricity::{Ampere, Kw, Kwh},
        time::{DateTime, HoursDecimal},
    },
    Result, UsageDataError,
};

use chrono::Duration;
use chrono_tz::Tz;

pub(crate) struct ChargeSession {
    pub periods: Vec<ChargePeriod>,
}

impl ChargeSession {
    /// Validate the periods of `cdr` and accumulate their usage.
    pub fn new(cdr: &Cdr, local_timezone: Tz) -> Result<Self> {
        validate(cdr)?;

        let mut periods: Vec<ChargePeriod> = Vec::new();

        for (i, period) in cdr.charging_periods.iter().enumerate() {
            let end_date_time = if let Some(next_period) = cdr.charging_periods.get(i + 1) {
                next_period.start_date_time
            } else {
                cdr.end_date_time
            };

            let next = if let Some(last) = periods.last() {
                last.next(period, end_date_time)
            } else {
                let session_start = InstantData::zero(cdr.start_date_time, local_timezone);
                ChargePeriod::new(&session_start, period, end_date_time)
            };

            periods.push(next);
        }

        Ok(Self { periods })
    }
}

fn validate(cdr: &Cdr) -> std::result::Result<(), UsageDataError> {
    let mut previous_start = None;

    for (period_index, period) in cdr.charging_periods.iter().enumerate() {
        if let Some(dimension) = period.dimensions.iter().find(|d| d.is_negative()) {
            return Err(UsageDataError::NegativeVolume {
                period_index,
                dimension: dimension.dimension_type(),
            });
        }

        if previous_start.is_some_and(|start| period.start_date_time < start) {
            return Err(UsageDataError::PeriodsOutOfOrder { period_index });
        }

        previous_start = Some(period.start_date_time);
    }

    if let Some(start) = previous_start {
        if cdr.end_date_time < start {
            return Err(UsageDataError::SessionEndsBeforePeriod {
                period_index: cdr.charging_periods.len() - 1,
            });
        }
    }

    Ok(())
}

/// Describes the properties of a single charging period.
pub(crate) struct ChargePeriod {
    /// Holds properties that are valid for the entirety of this period.
    pub period_data: PeriodData,
    /// Holds properties that are valid at start instant of this period.
    pub start_instant: InstantData,
    /// Holds properties that are valid at the end instant of this period.
    pub end_instant: InstantData,
}

impl ChargePeriod {
    /// Construct the first period of a session, which starts accumulating from `session_start`.
    fn new(
        session_start: &InstantData,
        period: &OcpiChargingPeriod,
        end_date_time: DateTime,
    ) -> Self {
        let start_instant = session_start.elapse_until(period.start_date_time);
        Self::starting_at(start_instant, period, end_date_time)
    }

    /// Construct a period with the properties of `period` that ends on `end_date_time` which succeeds `self`.
    fn next(&self, period: &OcpiChargingPeriod, end_date_time: DateTime) -> Self {
        Self::starting_at(self.end_instant.clone(), period, end_date_time)
    }

    fn starting_at(
        start_instant: InstantData,
        period: &OcpiChargingPeriod,
        end_date_time: DateTime,
    ) -> Self {
        let wall_clock = end_date_time.signed_duration_since(start_instant.date_time);
        let period_data = PeriodData::new(period, wall_clock);
        let end_instant = start_instant.next(&period_data, end_date_time);

        Self {
            period_data,
            start_instant,
            end_instant,
        }
    }
}

/// This describes the properties in the charge session that a valid during a certain period. For
/// example the `charging_duration` field is the charge duration during a certain charging period.
#[derive(Debug, Default)]
pub(crate) struct PeriodData {
    pub max_current: Option<Ampere>,
    pub min_current: Option<Ampere>,
    pub max_power: Option<Kw>,
    pub min_power: Option<Kw>,
    pub charging_duration: Option<HoursDecimal>,
    pub parking_duration: Option<HoursDecimal>,
    pub energy: Option<Kwh>,
}

impl PeriodData {
    /// Collect the reported usage of `period`, which lasted `wall_clock` in total.
    ///
    /// A period that reports neither charging nor parking time is considered to be charging for
    /// its whole duration.
    fn new(period: &OcpiChargingPeriod, wall_clock: Duration) -> Self {
        let mut inst = Self::default();
        let mut average_current = None;
        let mut average_power = None;

        for dimension in &period.dimensions {
            match *dimension {
                OcpiCdrDimension::MinCurrent(volume) => inst.min_current = Some(volume),
                OcpiCdrDimension::MaxCurrent(volume) => inst.max_current = Some(volume),
                OcpiCdrDimension::Current(volume) => average_current = Some(volume),
                OcpiCdrDimension::MaxPower(volume) => inst.max_power = Some(volume),
                OcpiCdrDimension::MinPower(volume) => inst.min_power = Some(volume),
                OcpiCdrDimension::Power(volume) => average_power = Some(volume),
                OcpiCdrDimension::Energy(volume) => inst.energy = Some(volume),
                OcpiCdrDimension::Time(volume) => inst.charging_duration = Some(volume),
                OcpiCdrDimension::ParkingTime(volume) => inst.parking_duration = Some(volume),
                OcpiCdrDimension::EnergyExport(_)
                | OcpiCdrDimension::EnergyImport(_)
                | OcpiCdrDimension::ReservationTime(_)
                | OcpiCdrDimension::StateOfCharge(_) => {}
            }
        }

        // Averages stand in for extremes that were not reported.
        inst.min_current = inst.min_current.or(average_current);
        inst.max_current = inst.max_current.or(average_current);
        inst.min_power = inst.min_power.or(average_power);
        inst.max_power = inst.max_power.or(average_power);

        if inst.charging_duration.is_none() && inst.parking_duration.is_none() {
            inst.charging_duration = Some(wall_clock.max(Duration::zero()).into());
        }

        inst
    }
}

/// This describes the properties in the charge session that are instantaneous. For example
/// the `total_energy` is the total amount of energy in the charge session at a certain instant.
#[derive(Debug, Clone)]
pub(crate) struct InstantData {
    pub local_timezone: Tz,
    pub date_time: DateTime,
    /// Time elapsed since the start of the session.
    pub total_duration: Duration,
    pub total_charging_duration: HoursDecimal,
    pub total_parking_duration: HoursDecimal,
    pub total_energy: Kwh,
}

impl InstantData {
    fn zero(date_time: DateTime, local_timezone: Tz) -> Self {
        Self {
            date_time,
            local_timezone,
            total_duration: Duration::zero(),
            total_charging_duration: HoursDecimal::zero(),
            total_parking_duration: HoursDecimal::zero(),
            total_energy: Kwh::zero(),
        }
    }

    /// Move the clock forward to `date_time` without any usage.
    fn elapse_until(&self, date_time: DateTime) -> Self {
        let mut next = self.clone();
        next.advance_clock(date_time);
        next
    }

    fn next(&self, state: &PeriodData, date_time: DateTime) -> Self {
        let mut next = self.clone();
        next.advance_clock(date_time);

        if let Some(duration) = state.charging_duration {
            next.total_charging_duration = next.total_charging_duration.saturating_add(duration);
        }

        if let Some(duration) = state.parking_duration {
            next.total_parking_duration = next.total_parking_duration.saturating_add(duration);
        }

        if let Some(energy) = state.energy {
            next.total_energy = next.total_energy.saturating_add(energy);
        }

        next
    }

    fn advance_clock(&mut self, date_time: DateTime) {
        let duration = date_time
            .signed_duration_since(self.date_time)
            .max(Duration::zero());

        self.total_duration = self
            .total_duration
            .checked_add(&duration)
            .unwrap_or(Duration::MAX);

        self.date_time = self.date_time.max(date_time);
    }

    pub fn local(&self) -> LocalTime {
        LocalTime::new(self.date_time, self.local_timezone)
    }
}
