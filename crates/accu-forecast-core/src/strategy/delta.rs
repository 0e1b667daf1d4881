use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::types::{ReportingPeriod, SampleDate, StrategyConfig};
use crate::ForecastResult;

use super::{end_value, period_zero_base, RawAbatement};

/// Raw stock delta per period: value at the period end minus the
/// previous period's end value. Period 0 differences against the
/// base-year override when configured, else its own sample start.
/// Negative deltas are emitted as-is; stock losses are not hidden.
pub(crate) fn compute(
    periods: &[ReportingPeriod],
    values: &BTreeMap<SampleDate, Decimal>,
    config: &StrategyConfig,
) -> ForecastResult<Vec<RawAbatement>> {
    let Some(first) = periods.first() else {
        return Ok(Vec::new());
    };

    let mut prev = period_zero_base(config, values, first)?;
    let mut out = Vec::with_capacity(periods.len());
    for period in periods {
        let end = end_value(values, period).map_err(|e| e.in_period(period.index))?;
        out.push(RawAbatement::plain(end - prev));
        prev = end;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{generate_periods, PeriodConvention, PeriodRequest};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn two_periods() -> Vec<ReportingPeriod> {
        generate_periods(
            &PeriodRequest {
                convention: PeriodConvention::CalendarYear,
                start_date: d(2025, 1, 1),
                horizon: 2,
            },
            None,
        )
        .unwrap()
    }

    fn values() -> BTreeMap<SampleDate, Decimal> {
        [
            (SampleDate::new(d(2024, 12, 31)), dec!(80.0)),
            (SampleDate::new(d(2025, 12, 31)), dec!(100.0)),
            (SampleDate::new(d(2026, 12, 31)), dec!(115.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn delta_differences_consecutive_end_stocks() {
        let raw = compute(&two_periods(), &values(), &StrategyConfig::default()).unwrap();
        assert_eq!(raw[0].value, dec!(20.0));
        assert_eq!(raw[1].value, dec!(15.0));
        assert!(!raw[0].discount_applied);
    }

    #[test]
    fn base_year_override_replaces_first_observation() {
        let config = StrategyConfig {
            base_year_value: Some(dec!(90.0)),
            ..StrategyConfig::default()
        };
        let raw = compute(&two_periods(), &values(), &config).unwrap();
        assert_eq!(raw[0].value, dec!(10.0));
        // Later periods are unaffected by the override.
        assert_eq!(raw[1].value, dec!(15.0));
    }

    #[test]
    fn stock_loss_stays_negative() {
        let mut v = values();
        v.insert(SampleDate::new(d(2026, 12, 31)), dec!(95.0));
        let raw = compute(&two_periods(), &v, &StrategyConfig::default()).unwrap();
        assert_eq!(raw[1].value, dec!(-5.0));
    }
}
