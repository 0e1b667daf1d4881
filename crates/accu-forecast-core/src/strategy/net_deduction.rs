use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::types::{ReportingPeriod, SampleDate, StrategyConfig};
use crate::ForecastResult;

use super::{end_value, period_zero_base, DeductionSource, RawAbatement};

/// Delta with a per-period deduction netted off the end-of-period
/// stock before differencing, then the permanence discount applied at
/// the crediting step.
///
/// The deduction comes from the reference table when one is supplied,
/// else `deduction_rate × raw_delta`. The next period differences
/// against the *unadjusted* end stock; deductions reduce the current
/// period's crediting only.
pub(crate) fn compute(
    periods: &[ReportingPeriod],
    values: &BTreeMap<SampleDate, Decimal>,
    config: &StrategyConfig,
    deductions: Option<&dyn DeductionSource>,
) -> ForecastResult<Vec<RawAbatement>> {
    let Some(first) = periods.first() else {
        return Ok(Vec::new());
    };

    let mut prev = period_zero_base(config, values, first)?;
    let mut out = Vec::with_capacity(periods.len());
    for period in periods {
        let end = end_value(values, period).map_err(|e| e.in_period(period.index))?;
        let raw_delta = end - prev;

        let deduction = match deductions {
            Some(source) => source
                .deduction_for(period)
                .map_err(|e| e.in_period(period.index))?,
            None => config
                .deduction_rate
                .map(|rate| rate * raw_delta)
                .unwrap_or(Decimal::ZERO),
        };

        let net = (end - deduction) - prev;
        out.push(RawAbatement {
            value: net * config.permanence_discount,
            discount_applied: true,
            first_deduction_applied: false,
        });
        prev = end;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{generate_periods, PeriodConvention, PeriodRequest};
    use crate::strategy::TableDeductions;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn periods() -> Vec<ReportingPeriod> {
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
            (SampleDate::new(d(2024, 12, 31)), dec!(100.0)),
            (SampleDate::new(d(2025, 12, 31)), dec!(120.0)),
            (SampleDate::new(d(2026, 12, 31)), dec!(150.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn deduction_table_nets_before_discount() {
        // Raw delta 20, deduction 5, discount 0.75: (20 - 5) * 0.75 = 11.25
        let table = TableDeductions::new([
            (d(2025, 12, 31), dec!(5.0)),
            (d(2026, 12, 31), dec!(10.0)),
        ]);
        let config = StrategyConfig {
            permanence_discount: dec!(0.75),
            ..StrategyConfig::default()
        };
        let raw = compute(&periods(), &values(), &config, Some(&table)).unwrap();
        assert_eq!(raw[0].value, dec!(11.25));
        // (30 - 10) * 0.75; previous base is the unadjusted end stock.
        assert_eq!(raw[1].value, dec!(15.00));
        assert!(raw[0].discount_applied);
    }

    #[test]
    fn rate_based_deduction_without_table() {
        let config = StrategyConfig {
            deduction_rate: Some(dec!(0.25)),
            permanence_discount: dec!(0.75),
            ..StrategyConfig::default()
        };
        // Raw delta 20, deduction 5: (20 - 5) * 0.75 = 11.25
        let raw = compute(&periods(), &values(), &config, None).unwrap();
        assert_eq!(raw[0].value, dec!(11.2500));
    }

    #[test]
    fn no_deduction_config_degenerates_to_discounted_delta() {
        let config = StrategyConfig {
            permanence_discount: dec!(0.75),
            ..StrategyConfig::default()
        };
        let raw = compute(&periods(), &values(), &config, None).unwrap();
        assert_eq!(raw[0].value, dec!(15.00));
    }

    #[test]
    fn missing_deduction_entry_names_the_period() {
        let table = TableDeductions::new([(d(2025, 12, 31), dec!(5.0))]);
        let err = compute(
            &periods(),
            &values(),
            &StrategyConfig::default(),
            Some(&table),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::error::ForecastError::Period { index: 1, .. }
        ));
    }
}
