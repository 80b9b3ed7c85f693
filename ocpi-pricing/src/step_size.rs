//! Rounding of billed volumes to the step size of a price component.

use rust_decimal::Decimal;

use crate::{
    ocpi::{Rounding, Version},
    pricer::{DimensionReport, PeriodReport},
    types::{electricity::Kwh, number::Number, time::HoursDecimal},
    Error, Result,
};

/// Round `volume` up to the smallest multiple of `step_size` that is not less than `volume`.
///
/// A `step_size` of zero leaves the volume untouched, a negative `step_size` is an error.
pub fn round_up(volume: Decimal, step_size: Decimal) -> Result<Decimal> {
    round_steps(volume.into(), step_size.into(), Rounding::STEP).map(Into::into)
}

/// Express `volume` in steps of `step_size`, round the number of steps with `step_round` and
/// convert back.
pub(crate) fn round_steps(
    volume: Number,
    step_size: Number,
    step_round: Rounding,
) -> Result<Number> {
    if step_size.is_zero() {
        return Ok(volume);
    }

    if step_size.is_sign_negative() {
        return Err(Error::RoundingOverflow);
    }

    let steps = volume.checked_div(step_size).ok_or(Error::RoundingOverflow)?;

    step_round
        .apply(steps)
        .checked_mul(step_size)
        .ok_or(Error::RoundingOverflow)
}

/// Applies step sizes to the billed volumes of priced periods and returns the billed session totals.
pub(crate) type Strategy = fn(&mut [PeriodReport]) -> Result<BilledVolumes>;

/// The session totals of every dimension after step sizes were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BilledVolumes {
    pub energy: Kwh,
    pub charging_time: HoursDecimal,
    pub parking_time: HoursDecimal,
}

impl BilledVolumes {
    fn sum(periods: &[PeriodReport]) -> Self {
        let mut billed = Self {
            energy: Kwh::zero(),
            charging_time: HoursDecimal::zero(),
            parking_time: HoursDecimal::zero(),
        };

        for period in periods {
            let dimensions = &period.dimensions;

            if let Some(energy) = dimensions.energy.billed_volume {
                billed.energy = billed.energy.saturating_add(energy);
            }

            if let Some(time) = dimensions.time.billed_volume {
                billed.charging_time = billed.charging_time.saturating_add(time);
            }

            if let Some(parking) = dimensions.parking_time.billed_volume {
                billed.parking_time = billed.parking_time.saturating_add(parking);
            }
        }

        billed
    }
}

/// When step sizes are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepSizeMode {
    /// Every period is rounded on its own (OCPI 2.1.1).
    PerPeriod,
    /// The session total of a dimension is rounded once (OCPI 2.2.1).
    Session,
}

impl From<Version> for StepSizeMode {
    fn from(version: Version) -> Self {
        match version {
            Version::V211 => Self::PerPeriod,
            Version::V221 => Self::Session,
        }
    }
}

impl StepSizeMode {
    pub fn strategy(self) -> Strategy {
        match self {
            Self::PerPeriod => per_period,
            Self::Session => per_session,
        }
    }
}

fn per_period(periods: &mut [PeriodReport]) -> Result<BilledVolumes> {
    for (index, period) in periods.iter_mut().enumerate() {
        let dimensions = &mut period.dimensions;

        round_period(index, &mut dimensions.energy, Kwh::round_to_step)?;
        round_period(index, &mut dimensions.time, HoursDecimal::round_to_step)?;
        round_period(index, &mut dimensions.parking_time, HoursDecimal::round_to_step)?;
    }

    Ok(BilledVolumes::sum(periods))
}

fn round_period<V>(
    index: usize,
    dimension: &mut DimensionReport<V>,
    round: fn(V, u64, Rounding) -> Result<V>,
) -> Result<()>
where
    V: Copy + std::fmt::Display,
{
    let (Some(price), Some(volume)) = (dimension.price, dimension.volume) else {
        return Ok(());
    };

    let billed = round(volume, price.step_size, price.step_round)?;
    tracing::trace!(period = index, %volume, %billed, step_size = price.step_size, "step size applied");
    dimension.billed_volume = Some(billed);

    Ok(())
}

fn per_session(periods: &mut [PeriodReport]) -> Result<BilledVolumes> {
    // Charging time is not rounded when parking time is billed as well.
    let bills_parking = periods
        .iter()
        .any(|period| period.dimensions.parking_time.is_priced());

    round_session(
        periods,
        |period| &mut period.dimensions.energy,
        Kwh::zero(),
        Kwh::saturating_add,
        Kwh::saturating_sub,
        Kwh::round_to_step,
    )?;

    if !bills_parking {
        round_session(
            periods,
            |period| &mut period.dimensions.time,
            HoursDecimal::zero(),
            HoursDecimal::saturating_add,
            HoursDecimal::saturating_sub,
            HoursDecimal::round_to_step,
        )?;
    }

    round_session(
        periods,
        |period| &mut period.dimensions.parking_time,
        HoursDecimal::zero(),
        HoursDecimal::saturating_add,
        HoursDecimal::saturating_sub,
        HoursDecimal::round_to_step,
    )?;

    Ok(BilledVolumes::sum(periods))
}

/// Round the priced session total of one dimension and bill the extra volume in the last period
/// that priced the dimension.
fn round_session<V>(
    periods: &mut [PeriodReport],
    dimension: fn(&mut PeriodReport) -> &mut DimensionReport<V>,
    zero: V,
    add: fn(V, V) -> V,
    sub: fn(V, V) -> V,
    round: fn(V, u64, Rounding) -> Result<V>,
) -> Result<()>
where
    V: Copy + std::fmt::Display,
{
    let mut total = zero;
    let mut last_priced = None;

    for (index, period) in periods.iter_mut().enumerate() {
        let report = dimension(period);

        if let (Some(price), Some(volume)) = (report.price, report.volume) {
            total = add(total, volume);
            last_priced = Some((index, price.step_size, price.step_round));
        }
    }

    let Some((index, step_size, step_round)) = last_priced else {
        return Ok(());
    };

    let billed = round(total, step_size, step_round)?;
    let delta = sub(billed, total);

    let Some(period) = periods.get_mut(index) else {
        return Ok(());
    };

    let report = dimension(period);
    let billed_volume = report.billed_volume.unwrap_or(zero);
    report.billed_volume = Some(add(billed_volume, delta));

    tracing::trace!(period = index, %total, %billed, %delta, step_size, "session step size applied");

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    use super::{round_up, StepSizeMode};
    use crate::{
        ocpi::{Rounding, RoundingGranularity, RoundingRule, Version},
        pricer::{DimensionReport, Dimensions, PeriodReport},
        tariff::PriceComponent,
        types::{electricity::Kwh, money::Money, time::HoursDecimal},
        Error,
    };

    fn component(step_size: u64) -> PriceComponent {
        PriceComponent {
            tariff_element_index: 0,
            price: Money::from(dec!(0.50)),
            vat: None,
            step_size,
            price_round: None,
            step_round: Rounding::STEP,
        }
    }

    fn period(
        energy: Option<(Kwh, u64)>,
        time: Option<(HoursDecimal, u64)>,
        parking: Option<(HoursDecimal, u64)>,
    ) -> PeriodReport {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        PeriodReport {
            start_date_time: start,
            end_date_time: start,
            tariff_element_index: Some(0),
            dimensions: Dimensions {
                flat: DimensionReport::new(None, Some(())),
                energy: dimension(energy),
                time: dimension(time),
                parking_time: dimension(parking),
            },
        }
    }

    fn dimension<V: Copy>(input: Option<(V, u64)>) -> DimensionReport<V> {
        match input {
            Some((volume, step_size)) => {
                DimensionReport::new(Some(component(step_size)), Some(volume))
            }
            None => DimensionReport::new(None, None),
        }
    }

    fn minutes(minutes: i64) -> HoursDecimal {
        Duration::try_minutes(minutes).unwrap().into()
    }

    #[test]
    fn rounds_up_to_smallest_multiple() {
        let cases = [
            (dec!(0.4), dec!(1), dec!(1)),
            (dec!(1.0), dec!(1), dec!(1)),
            (dec!(1.2), dec!(0.5), dec!(1.5)),
            (dec!(7103), dec!(300), dec!(7200)),
            (dec!(0), dec!(300), dec!(0)),
            (dec!(12.345), dec!(0), dec!(12.345)),
        ];

        for (volume, step_size, expected) in cases {
            let rounded = round_up(volume, step_size).unwrap();
            assert_eq!(rounded, expected, "{volume} in steps of {step_size}");
            assert!(rounded >= volume);
        }
    }

    #[test]
    fn negative_step_size_is_rejected() {
        assert!(matches!(
            round_up(dec!(1), dec!(-1)),
            Err(Error::RoundingOverflow)
        ));
    }

    #[test]
    fn per_period_and_session_rounding_differ() {
        let energy = Some((Kwh::from(dec!(0.4)), 1000));
        let session = || vec![period(energy, None, None); 3];

        let mut periods = session();
        let billed = StepSizeMode::from(Version::V211).strategy()(&mut periods).unwrap();
        assert_eq!(billed.energy, Kwh::from(dec!(3)));

        let mut periods = session();
        let billed = StepSizeMode::from(Version::V221).strategy()(&mut periods).unwrap();
        assert_eq!(billed.energy, Kwh::from(dec!(2)));

        // The extra volume is billed in the last priced period.
        assert_eq!(
            periods[2].dimensions.energy.billed_volume,
            Some(Kwh::from(dec!(1.2)))
        );
        assert_eq!(
            periods[0].dimensions.energy.billed_volume,
            Some(Kwh::from(dec!(0.4)))
        );
    }

    #[test]
    fn unpriced_volume_is_not_rounded() {
        let mut periods = vec![
            period(Some((Kwh::from(dec!(0.4)), 1000)), None, None),
            period(None, None, None),
        ];
        periods[1].dimensions.energy = DimensionReport::new(None, Some(Kwh::from(dec!(0.3))));

        let billed = StepSizeMode::Session.strategy()(&mut periods).unwrap();

        assert_eq!(billed.energy, Kwh::from(dec!(1.3)));
        assert_eq!(
            periods[0].dimensions.energy.billed_volume,
            Some(Kwh::from(dec!(1.0)))
        );
    }

    #[test]
    fn time_step_size_is_skipped_when_parking_is_billed() {
        let mut periods = vec![
            period(None, Some((minutes(7), 300)), None),
            period(None, None, Some((minutes(3), 300))),
        ];

        let billed = StepSizeMode::Session.strategy()(&mut periods).unwrap();

        assert_eq!(billed.charging_time, minutes(7));
        assert_eq!(billed.parking_time, minutes(5));
    }

    #[test]
    fn session_time_is_rounded_once() {
        let mut periods = vec![period(None, Some((minutes(7), 300)), None); 2];

        let billed = StepSizeMode::Session.strategy()(&mut periods).unwrap();

        assert_eq!(billed.charging_time, minutes(15));
        assert_eq!(periods[1].dimensions.time.billed_volume, Some(minutes(8)));
    }

    #[test]
    fn number_of_steps_follows_step_rounding() {
        let mut periods = vec![period(Some((Kwh::from(dec!(4.3)), 1000)), None, None)];
        if let Some(price) = periods[0].dimensions.energy.price.as_mut() {
            price.step_round = Rounding {
                round_granularity: RoundingGranularity::Unit,
                round_rule: RoundingRule::RoundDown,
            };
        }

        let billed = StepSizeMode::PerPeriod.strategy()(&mut periods).unwrap();

        assert_eq!(billed.energy, Kwh::from(dec!(4)));
    }
}
