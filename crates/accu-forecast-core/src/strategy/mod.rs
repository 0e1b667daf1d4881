//! Crediting strategies.
//!
//! The source procedures this engine replaces existed as several
//! near-duplicate calculation scripts; here they are a closed set of
//! variants selected by configuration:
//!
//! 1. **Delta** — raw change in end-of-period stock.
//! 2. **NetWithDeduction** — per-period deduction netted off the
//!    end-of-period stock before differencing, permanence discount
//!    applied at the crediting step.
//! 3. **ParametricGrowth** — analytic carbon-pool differences, no
//!    external lookup.
//!
//! All strategies run in strict increasing index order: each period's
//! result depends on the previous period's stock value.

mod deductions;
mod delta;
mod growth;
mod net_deduction;

pub use deductions::{DeductionSource, TableDeductions};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::stock::GrowthModel;
use crate::types::{ReportingPeriod, SampleDate, StrategyConfig};
use crate::ForecastResult;

/// A strategy's per-period output before the adjustment pipeline.
/// The flags record which pipeline steps the strategy pre-applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawAbatement {
    pub value: Decimal,
    pub discount_applied: bool,
    pub first_deduction_applied: bool,
}

impl RawAbatement {
    fn plain(value: Decimal) -> Self {
        RawAbatement {
            value,
            discount_applied: false,
            first_deduction_applied: false,
        }
    }
}

/// The crediting strategy for a run, together with its collaborators.
pub enum Strategy<'a> {
    Delta,
    NetWithDeduction {
        /// Per-period deduction table; when absent the deduction is
        /// `deduction_rate × raw_delta` (or zero if that is unset too).
        deductions: Option<&'a dyn DeductionSource>,
    },
    ParametricGrowth {
        model: GrowthModel,
        /// Project inception the model counts months from.
        inception: NaiveDate,
    },
}

impl Strategy<'_> {
    /// Whether this strategy reads the external stock series.
    pub fn needs_stock_series(&self) -> bool {
        !matches!(self, Strategy::ParametricGrowth { .. })
    }

    /// Compute one raw abatement per period, in index order.
    /// `values` holds the prefetched stock observations for every
    /// sample date the lookup strategies touch.
    pub(crate) fn compute(
        &self,
        periods: &[ReportingPeriod],
        values: &BTreeMap<SampleDate, Decimal>,
        config: &StrategyConfig,
    ) -> ForecastResult<Vec<RawAbatement>> {
        match self {
            Strategy::Delta => delta::compute(periods, values, config),
            Strategy::NetWithDeduction { deductions } => {
                net_deduction::compute(periods, values, config, *deductions)
            }
            Strategy::ParametricGrowth { model, inception } => {
                Ok(growth::compute(periods, model, *inception, config))
            }
        }
    }
}

/// Resolve the differencing base for period 0: the configured
/// base-year override, else the observation at the period's own
/// sample start.
fn period_zero_base(
    config: &StrategyConfig,
    values: &BTreeMap<SampleDate, Decimal>,
    first: &ReportingPeriod,
) -> ForecastResult<Decimal> {
    if let Some(base) = config.base_year_value {
        return Ok(base);
    }
    values
        .get(&first.sample_start)
        .copied()
        .ok_or(crate::error::ForecastError::ObservationNotFound {
            date: first.sample_start.date(),
        })
}

fn end_value(
    values: &BTreeMap<SampleDate, Decimal>,
    period: &ReportingPeriod,
) -> ForecastResult<Decimal> {
    values
        .get(&period.sample_end)
        .copied()
        .ok_or(crate::error::ForecastError::ObservationNotFound {
            date: period.sample_end.date(),
        })
}
