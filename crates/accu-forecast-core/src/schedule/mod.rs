//! Reporting-period schedule construction.
//!
//! All boundary-date handling lives here: the one-day reconciliation
//! offset and the period generators for each accounting convention.
//! Strategy code never manipulates dates directly.

mod generator;
mod reconcile;

pub use generator::{generate_periods, PeriodConvention, PeriodRequest, DEFAULT_GROWTH_MONTHS};
pub use reconcile::reconcile;

use chrono::{Datelike, NaiveDate};

/// Add whole months, clamping the day to the target month's length.
pub(crate) fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// Whole months completed between two dates. A partial trailing month
/// (end day-of-month before start day-of-month) does not count.
pub fn months_completed(from: NaiveDate, to: NaiveDate) -> i64 {
    if to < from {
        return -months_completed(to, from);
    }
    let mut total =
        i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month());
    if to.day() < from.day() {
        total -= 1;
    }
    total
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap_or(28)
}
