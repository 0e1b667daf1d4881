use chrono::NaiveDate;

use crate::types::SampleDate;

/// Map a nominal reporting-period boundary to the sample date the
/// external source actually holds: exactly one calendar day back.
///
/// The upstream source keys its values to the end of the previous
/// month, so a boundary of 1 Jan 2025 is looked up as 31 Dec 2024.
/// Applied uniformly to every boundary a generator emits, start and
/// end alike, so both ends of a period land on genuine end-of-month
/// samples.
pub fn reconcile(nominal: NaiveDate) -> SampleDate {
    // pred_opt is None only at NaiveDate::MIN.
    SampleDate::new(nominal.pred_opt().unwrap_or(nominal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn reconcile_crosses_year_boundary() {
        assert_eq!(reconcile(d(2025, 1, 1)).date(), d(2024, 12, 31));
    }

    #[test]
    fn reconcile_crosses_month_boundary() {
        assert_eq!(reconcile(d(2025, 3, 1)).date(), d(2025, 2, 28));
        assert_eq!(reconcile(d(2024, 3, 1)).date(), d(2024, 2, 29));
    }

    #[test]
    fn reconcile_mid_month() {
        assert_eq!(reconcile(d(2025, 7, 2)).date(), d(2025, 7, 1));
    }
}
