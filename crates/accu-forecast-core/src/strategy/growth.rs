use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::schedule::months_completed;
use crate::stock::GrowthModel;
use crate::types::{ReportingPeriod, StrategyConfig};

use super::RawAbatement;

/// Analytic carbon-pool difference per period: CP at the period's end
/// months minus CP at its start months, counted from project
/// inception. No external lookup. The flat first-period deduction, if
/// configured, comes off the raw value of period 0 only.
///
/// Months are measured at the nominal boundaries, not the reconciled
/// sample dates: the one-day lookup offset would otherwise undercount
/// every whole period by a month.
pub(crate) fn compute(
    periods: &[ReportingPeriod],
    model: &GrowthModel,
    inception: NaiveDate,
    config: &StrategyConfig,
) -> Vec<RawAbatement> {
    periods
        .iter()
        .map(|period| {
            let m_start = months_completed(inception, period.nominal_start);
            let m_end = months_completed(inception, boundary_after(period.nominal_end));
            let mut value = model.cp_at(m_end) - model.cp_at(m_start);

            let mut first_deduction_applied = false;
            if period.index == 0 {
                if let Some(deduction) = config.first_period_deduction {
                    value -= deduction;
                    first_deduction_applied = true;
                }
            }

            RawAbatement {
                value,
                discount_applied: false,
                first_deduction_applied,
            }
        })
        .collect()
}

/// The exclusive end boundary: the day after the inclusive nominal end.
fn boundary_after(nominal_end: NaiveDate) -> NaiveDate {
    nominal_end.succ_opt().unwrap_or(nominal_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{generate_periods, PeriodConvention, PeriodRequest};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn model() -> GrowthModel {
        GrowthModel::new(dec!(1000), dec!(5500), 180).unwrap()
    }

    fn yearly_periods(horizon: u32) -> Vec<ReportingPeriod> {
        generate_periods(
            &PeriodRequest {
                convention: PeriodConvention::FixedMonths {
                    length_months: 12,
                    max_elapsed_months: 180,
                },
                start_date: d(2021, 7, 1),
                horizon,
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn growth_delta_is_cp_difference() {
        let periods = yearly_periods(2);
        let raw = compute(&periods, &model(), d(2021, 7, 1), &StrategyConfig::default());
        // 12 months of growth per year: (12/180) * 4500 = 300 per period.
        assert_eq!(raw[0].value, dec!(300));
        assert_eq!(raw[1].value, dec!(300));
        assert!(!raw[0].discount_applied);
    }

    #[test]
    fn first_period_deduction_hits_period_zero_only() {
        let config = StrategyConfig {
            first_period_deduction: Some(dec!(50)),
            ..StrategyConfig::default()
        };
        let periods = yearly_periods(2);
        let raw = compute(&periods, &model(), d(2021, 7, 1), &config);
        assert_eq!(raw[0].value, dec!(250));
        assert!(raw[0].first_deduction_applied);
        assert_eq!(raw[1].value, dec!(300));
        assert!(!raw[1].first_deduction_applied);
    }

    #[test]
    fn growth_flattens_at_the_asymptote() {
        // 16 yearly periods: the 180-month ceiling caps generation at 15.
        let periods = yearly_periods(16);
        assert_eq!(periods.len(), 15);
        let raw = compute(&periods, &model(), d(2021, 7, 1), &StrategyConfig::default());
        assert_eq!(raw[14].value, dec!(300));
    }
}
