use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ForecastError;
use crate::types::{SampleDate, StockObservation};
use crate::ForecastResult;

/// Capability the engine needs from a stock data source: one scalar
/// per sample date. The source is treated as append-only and
/// read-only.
pub trait StockSeries {
    /// Fetch the observation recorded at exactly `date`. A missing
    /// date is an error, never a silent zero — reconciliation is
    /// expected to have produced a date the source holds.
    fn lookup(&self, date: SampleDate) -> ForecastResult<StockObservation>;

    /// Bulk fetch for a calculation pass. One call replaces
    /// O(periods) round trips against sources where lookups block.
    fn lookup_many(&self, dates: &[SampleDate]) -> ForecastResult<Vec<StockObservation>> {
        dates.iter().map(|&d| self.lookup(d)).collect()
    }

    /// Every date the source holds, ascending. Used by the
    /// financial-year generator to locate its July anchor.
    fn available_dates(&self) -> BTreeSet<NaiveDate>;
}

/// Stock series backed by a tabular export, indexed by date once at
/// construction for repeated lookups.
#[derive(Debug, Clone, Default)]
pub struct TableStockSeries {
    by_date: BTreeMap<NaiveDate, Decimal>,
}

impl TableStockSeries {
    /// Build the index from (date, value) rows. Duplicate dates keep
    /// the later row, matching the source-export convention.
    pub fn new(rows: impl IntoIterator<Item = (NaiveDate, Decimal)>) -> Self {
        let mut by_date = BTreeMap::new();
        for (date, value) in rows {
            by_date.insert(date, value);
        }
        TableStockSeries { by_date }
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }
}

impl StockSeries for TableStockSeries {
    fn lookup(&self, date: SampleDate) -> ForecastResult<StockObservation> {
        let value = self
            .by_date
            .get(&date.date())
            .copied()
            .ok_or(ForecastError::ObservationNotFound { date: date.date() })?;
        Ok(StockObservation { date, value })
    }

    fn available_dates(&self) -> BTreeSet<NaiveDate> {
        self.by_date.keys().copied().collect()
    }
}
