use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use chrono_tz::Tz;

use crate::{ocpi::cdr::OcpiCdrLocation, types::time::DateTime, Warning};

/// A function from an ISO 3166-1 country code to an IANA time-zone identifier.
pub type TimeZoneLookup<'a> = &'a (dyn Fn(&str) -> Option<String> + Sync);

/// Where the local time-zone of a charge session comes from.
#[derive(Clone, Copy)]
pub enum TimeZoneSource<'a> {
    /// Always use this time-zone.
    Fixed(Tz),
    /// Use the time-zone of the CDR location if it has one, otherwise look it up by country.
    Lookup(TimeZoneLookup<'a>),
    /// Use the time-zone of the CDR location if it has one, otherwise detect it from the country
    /// using [`detect_time_zone`].
    Detect,
}

impl Default for TimeZoneSource<'_> {
    fn default() -> Self {
        Self::Detect
    }
}

/// Resolve the local time-zone of a CDR location.
///
/// Falls back to UTC when no time-zone can be found, which is reported in `warnings`.
pub(crate) fn resolve(
    location: &OcpiCdrLocation,
    source: TimeZoneSource<'_>,
    warnings: &mut Vec<Warning>,
) -> Tz {
    let lookup = match source {
        TimeZoneSource::Fixed(tz) => return tz,
        TimeZoneSource::Lookup(lookup) => Some(lookup),
        TimeZoneSource::Detect => None,
    };

    if let Some(time_zone) = &location.time_zone {
        match time_zone.parse::<Tz>() {
            Ok(tz) => return tz,
            Err(_) => warnings.push(Warning::InvalidTimeZone {
                time_zone: time_zone.clone(),
            }),
        }
    }

    let identifier = match lookup {
        Some(lookup) => lookup(&location.country),
        None => detect_time_zone(&location.country).map(|tz| tz.name().to_owned()),
    };

    if let Some(tz) = identifier.and_then(|id| id.parse::<Tz>().ok()) {
        return tz;
    }

    warnings.push(Warning::UnresolvedTimeZone {
        country: location.country.clone(),
    });

    Tz::UTC
}

/// The wall clock at an instant in a specific time-zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTime {
    /// Local calendar date.
    pub date: NaiveDate,
    /// Local time of day.
    pub time: NaiveTime,
    /// Local day of the week.
    pub weekday: Weekday,
}

impl LocalTime {
    /// Convert `instant` to the wall clock of `tz`, taking daylight saving time into account.
    pub fn new(instant: DateTime, tz: Tz) -> Self {
        let local = instant.with_timezone(&tz);

        Self {
            date: local.date_naive(),
            time: local.time(),
            weekday: local.weekday(),
        }
    }

    /// Minutes elapsed since local midnight.
    pub fn minute_of_day(&self) -> u32 {
        self.time.num_seconds_from_midnight() / 60
    }

    pub(crate) fn is_at_midnight(&self) -> bool {
        self.time.num_seconds_from_midnight() == 0
    }
}

/// Mapping of European countries to time zones with geographical naming
///
/// This is only possible for countries with a single time zone and only for countries as they
/// currently exist (2024). It's a best effort approach to determine a timezone from just a ALPHA-3
/// ISO 3166-1 country code.
///
/// In small edge cases (e.g. Gibraltar) this detection might generate the wrong time-zone.
pub fn detect_time_zone(code: &str) -> Option<Tz> {
    let tz = match code {
        "AND" => Tz::Europe__Andorra,
        "ALB" => Tz::Europe__Tirane,
        "AUT" => Tz::Europe__Vienna,
        "BIH" => Tz::Europe__Sarajevo,
        "BEL" => Tz::Europe__Brussels,
        "BGR" => Tz::Europe__Sofia,
        "BLR" => Tz::Europe__Minsk,
        "CHE" => Tz::Europe__Zurich,
        "CYP" => Tz::Europe__Nicosia,
        "CZE" => Tz::Europe__Prague,
        "DEU" => Tz::Europe__Berlin,
        "DNK" => Tz::Europe__Copenhagen,
        "EST" => Tz::Europe__Tallinn,
        "ESP" => Tz::Europe__Madrid,
        "FIN" => Tz::Europe__Helsinki,
        "FRA" => Tz::Europe__Paris,
        "GBR" => Tz::Europe__London,
        "GRC" => Tz::Europe__Athens,
        "HRV" => Tz::Europe__Zagreb,
        "HUN" => Tz::Europe__Budapest,
        "IRL" => Tz::Europe__Dublin,
        "ISL" => Tz::Iceland,
        "ITA" => Tz::Europe__Rome,
        "LIE" => Tz::Europe__Vaduz,
        "LTU" => Tz::Europe__Vilnius,
        "LUX" => Tz::Europe__Luxembourg,
        "LVA" => Tz::Europe__Riga,
        "MCO" => Tz::Europe__Monaco,
        "MDA" => Tz::Europe__Chisinau,
        "MNE" => Tz::Europe__Podgorica,
        "MKD" => Tz::Europe__Skopje,
        "MLT" => Tz::Europe__Malta,
        "NLD" => Tz::Europe__Amsterdam,
        "NOR" => Tz::Europe__Oslo,
        "POL" => Tz::Europe__Warsaw,
        "PRT" => Tz::Europe__Lisbon,
        "ROU" => Tz::Europe__Bucharest,
        "SRB" => Tz::Europe__Belgrade,
        "SWE" => Tz::Europe__Stockholm,
        "SVN" => Tz::Europe__Ljubljana,
        "SVK" => Tz::Europe__Bratislava,
        "SMR" => Tz::Europe__San_Marino,
        "TUR" => Tz::Europe__Istanbul,
        "UKR" => Tz::Europe__Kiev,
        _ => return None,
    };

    Some(tz)
}
