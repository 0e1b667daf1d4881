use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::types::{ReportingPeriod, SampleDate};
use crate::ForecastResult;

use super::{add_months, reconcile::reconcile};

/// Elapsed-month ceiling at which the parametric growth model reaches
/// its asymptote; no fixed-length periods are generated past it.
pub const DEFAULT_GROWTH_MONTHS: u32 = 180;

fn default_anchor_days() -> Vec<u32> {
    vec![1, 2]
}

fn default_max_elapsed() -> u32 {
    DEFAULT_GROWTH_MONTHS
}

/// Accounting convention a period sequence follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodConvention {
    /// [1 Jan Y, 31 Dec Y], labelled "2025".
    CalendarYear,
    /// [1 Jul Y, 30 Jun Y+1], labelled "FY2023/24". The upstream
    /// source sometimes anchors its July row on the 2nd rather than
    /// the 1st; any day-of-month in `anchor_days` is accepted.
    FinancialYear {
        #[serde(default = "default_anchor_days")]
        anchor_days: Vec<u32>,
    },
    /// Fixed-length sub-annual periods counted from project inception,
    /// labelled "RP1", "RP2", ... Generation stops once a period would
    /// begin at or past `max_elapsed_months`.
    FixedMonths {
        length_months: u32,
        #[serde(default = "default_max_elapsed")]
        max_elapsed_months: u32,
    },
}

/// A period-generation request: convention, declared start, horizon.
/// Horizon counts years for the annual conventions and periods for
/// `FixedMonths`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRequest {
    pub convention: PeriodConvention,
    pub start_date: NaiveDate,
    pub horizon: u32,
}

/// Generate the ordered reporting-period sequence for a request.
///
/// `available_dates` is the set of dates the stock source actually
/// holds; the financial-year convention consults it to locate its July
/// anchor. Every emitted boundary goes through `reconcile`.
pub fn generate_periods(
    request: &PeriodRequest,
    available_dates: Option<&BTreeSet<NaiveDate>>,
) -> ForecastResult<Vec<ReportingPeriod>> {
    if request.horizon == 0 {
        return Err(ForecastError::InvalidConfig {
            field: "horizon".into(),
            reason: "must be greater than 0".into(),
        });
    }

    match &request.convention {
        PeriodConvention::CalendarYear => generate_calendar_years(request),
        PeriodConvention::FinancialYear { anchor_days } => {
            generate_financial_years(request, anchor_days, available_dates)
        }
        PeriodConvention::FixedMonths {
            length_months,
            max_elapsed_months,
        } => generate_fixed_months(request, *length_months, *max_elapsed_months),
    }
}

fn period_from_boundaries(
    index: usize,
    start_boundary: NaiveDate,
    next_boundary: NaiveDate,
    label: String,
) -> ForecastResult<ReportingPeriod> {
    let nominal_end = next_boundary.pred_opt().ok_or_else(|| {
        ForecastError::DateError(format!("boundary {next_boundary} has no predecessor"))
    })?;
    Ok(ReportingPeriod {
        index,
        nominal_start: start_boundary,
        nominal_end,
        sample_start: reconcile(start_boundary),
        sample_end: reconcile(next_boundary),
        label,
    })
}

fn generate_calendar_years(request: &PeriodRequest) -> ForecastResult<Vec<ReportingPeriod>> {
    let first_year = request.start_date.year();
    let mut periods = Vec::with_capacity(request.horizon as usize);
    for i in 0..request.horizon {
        let year = first_year + i as i32;
        let start = ymd(year, 1, 1)?;
        let next = ymd(year + 1, 1, 1)?;
        periods.push(period_from_boundaries(
            i as usize,
            start,
            next,
            year.to_string(),
        )?);
    }
    Ok(periods)
}

fn generate_financial_years(
    request: &PeriodRequest,
    anchor_days: &[u32],
    available_dates: Option<&BTreeSet<NaiveDate>>,
) -> ForecastResult<Vec<ReportingPeriod>> {
    if anchor_days.is_empty() {
        return Err(ForecastError::InvalidConfig {
            field: "anchor_days".into(),
            reason: "at least one acceptable July anchor day is required".into(),
        });
    }
    let anchor = financial_year_anchor(request.start_date, anchor_days, available_dates)?;

    let mut periods = Vec::with_capacity(request.horizon as usize);
    for i in 0..request.horizon {
        let start = ymd(anchor.year() + i as i32, 7, anchor.day())?;
        let next = ymd(anchor.year() + i as i32 + 1, 7, anchor.day())?;
        let label = format!(
            "FY{}/{:02}",
            start.year(),
            (start.year() + 1).rem_euclid(100)
        );
        periods.push(period_from_boundaries(i as usize, start, next, label)?);
    }

    // A 2-Jul anchor reconciles to 1 Jul, a date a 2-Jul-anchored
    // export does not hold. The anchor row itself was just verified
    // present, so key the first lookup to it when the reconciled date
    // is absent.
    if let Some(available) = available_dates {
        if let Some(first) = periods.first_mut() {
            if !available.contains(&first.sample_start.date()) && available.contains(&anchor) {
                first.sample_start = SampleDate::new(anchor);
            }
        }
    }
    Ok(periods)
}

/// Locate the July date the starting financial year is anchored on.
///
/// When the declared start already falls on an acceptable anchor it is
/// used directly. Otherwise the stock source's dates are searched for
/// a July row in the FY containing the start (or the one after, when
/// the declared start lands late in an FY the source no longer
/// covers).
fn financial_year_anchor(
    start: NaiveDate,
    anchor_days: &[u32],
    available_dates: Option<&BTreeSet<NaiveDate>>,
) -> ForecastResult<NaiveDate> {
    if start.month() == 7 && anchor_days.contains(&start.day()) {
        return Ok(start);
    }

    let fy_year = if start.month() >= 7 {
        start.year()
    } else {
        start.year() - 1
    };

    let Some(available) = available_dates else {
        return ymd(fy_year, 7, 1);
    };

    for year in [fy_year, fy_year + 1] {
        for &day in anchor_days {
            let candidate = ymd(year, 7, day)?;
            if available.contains(&candidate) {
                return Ok(candidate);
            }
        }
    }
    Err(ForecastError::DateError(format!(
        "no financial-year anchor (July day in {anchor_days:?}) found in the stock source \
         for FY{fy_year} or FY{}",
        fy_year + 1
    )))
}

fn generate_fixed_months(
    request: &PeriodRequest,
    length_months: u32,
    max_elapsed_months: u32,
) -> ForecastResult<Vec<ReportingPeriod>> {
    if length_months == 0 {
        return Err(ForecastError::InvalidConfig {
            field: "length_months".into(),
            reason: "must be greater than 0".into(),
        });
    }
    let inception = request.start_date;
    let mut periods = Vec::new();
    for i in 0..request.horizon {
        let elapsed_at_start = i * length_months;
        if elapsed_at_start >= max_elapsed_months {
            break;
        }
        let start = add_months(inception, (i * length_months) as i32);
        let next = add_months(inception, ((i + 1) * length_months) as i32);
        periods.push(period_from_boundaries(
            i as usize,
            start,
            next,
            format!("RP{}", i + 1),
        )?);
    }
    Ok(periods)
}

fn ymd(year: i32, month: u32, day: u32) -> ForecastResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ForecastError::DateError(format!("invalid date {year}-{month:02}-{day:02}")))
}
