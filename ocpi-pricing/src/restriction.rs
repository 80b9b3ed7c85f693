use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveTime, Timelike, Weekday};

use crate::{
    ocpi::tariff::OcpiTariffRestriction,
    session::{InstantData, PeriodData},
    types::electricity::{Ampere, Kw, Kwh},
};

/// Flatten `restriction` into bounds. Duration bounds are emitted once for every kind of elapsed
/// time in `durations`, none when it is empty.
pub(crate) fn collect_restrictions(
    restriction: &OcpiTariffRestriction,
    durations: &[Elapsed],
) -> Vec<Restriction> {
    let mut collected = Vec::new();

    let start_time = restriction.start_time.map(NaiveTime::from);
    // An end time of midnight is the end of the day.
    let end_time = restriction
        .end_time
        .map(NaiveTime::from)
        .filter(|end_time| end_time.num_seconds_from_midnight() != 0);

    match (start_time, end_time) {
        (Some(start_time), Some(end_time)) if end_time < start_time => {
            collected.push(Restriction::WrappingTime {
                start_time,
                end_time,
            });
        }
        // Equal start and end times cover the whole day.
        (Some(start_time), Some(end_time)) if end_time == start_time => {}
        (start_time, end_time) => {
            if let Some(start_time) = start_time {
                collected.push(Restriction::StartTime(start_time));
            }

            if let Some(end_time) = end_time {
                collected.push(Restriction::EndTime(end_time));
            }
        }
    }

    if let Some(start_date) = restriction.start_date {
        collected.push(Restriction::StartDate(start_date.into()));
    }

    if let Some(end_date) = restriction.end_date {
        collected.push(Restriction::EndDate(end_date.into()));
    }

    if let Some(min_kwh) = restriction.min_kwh {
        collected.push(Restriction::MinKwh(min_kwh));
    }

    if let Some(max_kwh) = restriction.max_kwh {
        collected.push(Restriction::MaxKwh(max_kwh));
    }

    if let Some(min_current) = restriction.min_current {
        collected.push(Restriction::MinCurrent(min_current));
    }

    if let Some(max_current) = restriction.max_current {
        collected.push(Restriction::MaxCurrent(max_current));
    }

    if let Some(min_power) = restriction.min_power {
        collected.push(Restriction::MinPower(min_power));
    }

    if let Some(max_power) = restriction.max_power {
        collected.push(Restriction::MaxPower(max_power));
    }

    for &elapsed in durations {
        if let Some(min_duration) = restriction.min_duration {
            collected.push(Restriction::MinDuration(elapsed, min_duration.into()));
        }

        if let Some(max_duration) = restriction.max_duration {
            collected.push(Restriction::MaxDuration(elapsed, max_duration.into()));
        }
    }

    if !restriction.day_of_week.is_empty() {
        collected.push(Restriction::DayOfWeek(
            restriction.day_of_week.iter().copied().map(Into::into).collect(),
        ));
    }

    collected
}

/// The time a duration bound is compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Elapsed {
    /// Wall-clock time since the start of the session.
    Session,
    Charging,
    Parking,
    ChargingAndParking,
}

impl Elapsed {
    fn at(self, instant: &InstantData) -> Duration {
        match self {
            Self::Session => instant.total_duration,
            Self::Charging => instant.total_charging_duration.into(),
            Self::Parking => instant.total_parking_duration.into(),
            Self::ChargingAndParking => instant
                .total_charging_duration
                .saturating_add(instant.total_parking_duration)
                .into(),
        }
    }
}

/// A single bound of a tariff restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Restriction {
    StartTime(NaiveTime),
    EndTime(NaiveTime),
    /// A time window that passes midnight.
    WrappingTime {
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
    StartDate(NaiveDate),
    EndDate(NaiveDate),
    MinKwh(Kwh),
    MaxKwh(Kwh),
    MinCurrent(Ampere),
    MaxCurrent(Ampere),
    MinPower(Kw),
    MaxPower(Kw),
    MinDuration(Elapsed, Duration),
    MaxDuration(Elapsed, Duration),
    DayOfWeek(HashSet<Weekday>),
}

impl Restriction {
    /// Checks if this restriction is valid at `instant`. The time based restrictions are
    /// treated as exclusive comparisons.
    pub fn instant_validity_exclusive(&self, instant: &InstantData) -> bool {
        let local = instant.local();

        match self {
            &Self::WrappingTime {
                start_time,
                end_time,
            } => local.time >= start_time || local.time < end_time,
            &Self::StartTime(start_time) => local.time >= start_time,
            &Self::EndTime(end_time) => local.time < end_time,
            &Self::StartDate(start_date) => local.date >= start_date,
            &Self::EndDate(end_date) => local.date < end_date,
            &Self::MinKwh(min_energy) => instant.total_energy >= min_energy,
            &Self::MaxKwh(max_energy) => instant.total_energy < max_energy,
            &Self::MinDuration(elapsed, min_duration) => elapsed.at(instant) >= min_duration,
            &Self::MaxDuration(elapsed, max_duration) => elapsed.at(instant) < max_duration,
            Self::DayOfWeek(days) => days.contains(&local.weekday),
            Self::MinCurrent(_) | Self::MaxCurrent(_) | Self::MinPower(_) | Self::MaxPower(_) => {
                true
            }
        }
    }

    /// Checks if this restriction is valid at `instant`. The time based restriction are treated as
    /// inclusive comparisons.
    ///
    /// For example an instant at 00:00 on a tuesday is regarded as valid for a restriction that
    /// has a `DayOfWeek` which includes monday.
    pub fn instant_validity_inclusive(&self, instant: &InstantData) -> bool {
        let local = instant.local();

        match self {
            &Self::WrappingTime {
                start_time,
                end_time,
            } => local.time >= start_time || local.time <= end_time,
            &Self::StartTime(start_time) => local.time >= start_time || local.is_at_midnight(),
            &Self::EndTime(end_time) => local.time <= end_time,
            &Self::StartDate(start_date) => local.date >= start_date,
            &Self::EndDate(end_date) => {
                // The end of a period is the start of the next one, so a period may end right at
                // the start of `end_date`.
                let is_before_end_date = local.date < end_date;
                let is_on_end_date = local.date == end_date;

                is_before_end_date || (is_on_end_date && local.is_at_midnight())
            }
            &Self::MinKwh(min_energy) => instant.total_energy >= min_energy,
            &Self::MaxKwh(max_energy) => instant.total_energy <= max_energy,
            &Self::MinDuration(elapsed, min_duration) => elapsed.at(instant) >= min_duration,
            &Self::MaxDuration(elapsed, max_duration) => elapsed.at(instant) <= max_duration,
            Self::DayOfWeek(days) => {
                let includes_weekday = days.contains(&local.weekday);
                let includes_day_before = days.contains(&local.weekday.pred());
                includes_weekday || (includes_day_before && local.is_at_midnight())
            }
            Self::MinCurrent(_) | Self::MaxCurrent(_) | Self::MinPower(_) | Self::MaxPower(_) => {
                true
            }
        }
    }

    /// Checks if this restriction is valid for `state`. Bounds on values the period does not
    /// report are ignored.
    pub fn period_validity(&self, state: &PeriodData) -> bool {
        match self {
            &Self::MinCurrent(min_current) => state
                .min_current
                .map(|current| current >= min_current)
                .unwrap_or(true),
            &Self::MaxCurrent(max_current) => state
                .max_current
                .map(|current| current < max_current)
                .unwrap_or(true),
            &Self::MinPower(min_power) => state
                .min_power
                .map(|power| power >= min_power)
                .unwrap_or(true),
            &Self::MaxPower(max_power) => state
                .max_power
                .map(|power| power < max_power)
                .unwrap_or(true),
            _ => true,
        }
    }
}
