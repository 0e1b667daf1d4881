use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ForecastError;
use crate::types::ReportingPeriod;
use crate::ForecastResult;

/// Per-period deduction amounts, keyed by reporting period. Consumed
/// by the NetWithDeduction strategy only.
pub trait DeductionSource {
    fn deduction_for(&self, period: &ReportingPeriod) -> ForecastResult<Decimal>;
}

/// Deduction reference table keyed by reconciled period end date,
/// mirroring the per-CEA deduction columns of the source exports.
#[derive(Debug, Clone, Default)]
pub struct TableDeductions {
    by_end_date: BTreeMap<NaiveDate, Decimal>,
}

impl TableDeductions {
    pub fn new(rows: impl IntoIterator<Item = (NaiveDate, Decimal)>) -> Self {
        TableDeductions {
            by_end_date: rows.into_iter().collect(),
        }
    }
}

impl DeductionSource for TableDeductions {
    fn deduction_for(&self, period: &ReportingPeriod) -> ForecastResult<Decimal> {
        self.by_end_date
            .get(&period.sample_end.date())
            .copied()
            .ok_or(ForecastError::DeductionNotFound {
                date: period.sample_end.date(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{generate_periods, PeriodConvention, PeriodRequest};
    use rust_decimal_macros::dec;

    #[test]
    fn table_keyed_by_sample_end() {
        let request = PeriodRequest {
            convention: PeriodConvention::CalendarYear,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            horizon: 1,
        };
        let periods = generate_periods(&request, None).unwrap();
        let table = TableDeductions::new([(
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            dec!(5.0),
        )]);
        assert_eq!(table.deduction_for(&periods[0]).unwrap(), dec!(5.0));
    }

    #[test]
    fn missing_period_is_an_error() {
        let request = PeriodRequest {
            convention: PeriodConvention::CalendarYear,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            horizon: 1,
        };
        let periods = generate_periods(&request, None).unwrap();
        let table = TableDeductions::default();
        assert!(matches!(
            table.deduction_for(&periods[0]).unwrap_err(),
            ForecastError::DeductionNotFound { .. }
        ));
    }
}
