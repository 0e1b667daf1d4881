//! Report assembly: the top-level "build report" operation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::adjust;
use crate::error::ForecastError;
use crate::schedule::{generate_periods, PeriodRequest};
use crate::stock::StockSeries;
use crate::strategy::Strategy;
use crate::types::{
    AbatementRecord, ForecastReport, ReportingPeriod, SampleDate, StrategyConfig,
};
use crate::ForecastResult;

/// Generate the period sequence for `request` and build the forecast.
/// The stock source's available dates feed the financial-year anchor
/// search when a source is present.
pub fn run(
    request: &PeriodRequest,
    strategy: &Strategy<'_>,
    series: Option<&dyn StockSeries>,
    config: &StrategyConfig,
) -> ForecastResult<ForecastReport> {
    let available = series.map(|s| s.available_dates());
    let periods = generate_periods(request, available.as_ref())?;
    build_report(&periods, strategy, series, config)
}

/// Apply `strategy` to an already-generated period sequence and
/// assemble the adjusted, cumulative record series.
///
/// Every required sample date is fetched in one bulk call before the
/// calculation pass. A failure on any period aborts the whole report:
/// periods are interdependent through the cumulative total, so partial
/// output would be misleading.
pub fn build_report(
    periods: &[ReportingPeriod],
    strategy: &Strategy<'_>,
    series: Option<&dyn StockSeries>,
    config: &StrategyConfig,
) -> ForecastResult<ForecastReport> {
    config.validate()?;

    let values = if strategy.needs_stock_series() {
        let series = series.ok_or_else(|| ForecastError::InvalidConfig {
            field: "stock_series".into(),
            reason: "this strategy reads the external stock series".into(),
        })?;
        prefetch(series, periods, config)?
    } else {
        BTreeMap::new()
    };

    let raw = strategy.compute(periods, &values, config)?;

    let mut records = Vec::with_capacity(periods.len());
    let mut cumulative = Decimal::ZERO;
    for (period, raw) in periods.iter().zip(raw) {
        let adjusted = adjust::apply(&raw, period.index, config);
        cumulative += adjusted;
        records.push(AbatementRecord {
            period: period.clone(),
            raw_value: raw.value,
            adjusted_value: adjusted,
            cumulative_value: cumulative,
            discount_applied: raw.discount_applied,
            first_deduction_applied: raw.first_deduction_applied,
        });
    }

    Ok(ForecastReport { records })
}

/// One bulk fetch of every sample date the calculation pass will
/// touch: each period's end, plus the first period's start when no
/// base-year override is configured.
fn prefetch(
    series: &dyn StockSeries,
    periods: &[ReportingPeriod],
    config: &StrategyConfig,
) -> ForecastResult<BTreeMap<SampleDate, Decimal>> {
    let mut dates: Vec<SampleDate> = Vec::with_capacity(periods.len() + 1);
    if config.base_year_value.is_none() {
        if let Some(first) = periods.first() {
            dates.push(first.sample_start);
        }
    }
    dates.extend(periods.iter().map(|p| p.sample_end));

    let observations = series.lookup_many(&dates).map_err(|e| match &e {
        ForecastError::ObservationNotFound { date } => {
            let index = periods
                .iter()
                .position(|p| p.sample_end.date() == *date || p.sample_start.date() == *date)
                .unwrap_or(0);
            e.in_period(index)
        }
        _ => e,
    })?;

    Ok(observations
        .into_iter()
        .map(|obs| (obs.date, obs.value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::PeriodConvention;
    use crate::stock::TableStockSeries;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series() -> TableStockSeries {
        TableStockSeries::new([
            (d(2024, 12, 31), dec!(80.0)),
            (d(2025, 12, 31), dec!(100.0)),
            (d(2026, 12, 31), dec!(115.0)),
        ])
    }

    fn request(horizon: u32) -> PeriodRequest {
        PeriodRequest {
            convention: PeriodConvention::CalendarYear,
            start_date: d(2025, 1, 1),
            horizon,
        }
    }

    #[test]
    fn cumulative_is_prefix_sum_of_adjusted() {
        let series = series();
        let report = run(
            &request(2),
            &Strategy::Delta,
            Some(&series),
            &StrategyConfig::default(),
        )
        .unwrap();
        let mut sum = Decimal::ZERO;
        for record in &report.records {
            sum += record.adjusted_value;
            assert_eq!(record.cumulative_value, sum);
        }
        assert_eq!(report.total(), dec!(35.0));
    }

    #[test]
    fn lookup_strategy_without_series_is_rejected() {
        let err = run(&request(2), &Strategy::Delta, None, &StrategyConfig::default())
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidConfig { .. }));
    }

    #[test]
    fn missing_observation_aborts_with_period_index() {
        let series = series();
        let err = run(
            &request(3),
            &Strategy::Delta,
            Some(&series),
            &StrategyConfig::default(),
        )
        .unwrap_err();
        // 2027-12-31 is absent; period 2 is the offender.
        assert!(matches!(err, ForecastError::Period { index: 2, .. }));
    }

    #[test]
    fn conflicting_base_year_options_are_rejected() {
        let series = series();
        let config = StrategyConfig {
            base_year_value: Some(dec!(80.0)),
            use_first_observation: true,
            ..StrategyConfig::default()
        };
        let err = run(&request(2), &Strategy::Delta, Some(&series), &config).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidConfig { .. }));
    }

    #[test]
    fn identical_inputs_yield_identical_records() {
        let series = series();
        let config = StrategyConfig {
            permanence_discount: dec!(0.75),
            ..StrategyConfig::default()
        };
        let a = run(&request(2), &Strategy::Delta, Some(&series), &config).unwrap();
        let b = run(&request(2), &Strategy::Delta, Some(&series), &config).unwrap();
        assert_eq!(a, b);
    }
}
