//! Side-by-side comparison of two scenario outputs (e.g. Baseline vs
//! Project): outer-join on sample date with one column per
//! (scenario × metric) pair.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ForecastReport;

/// Header variants the upstream exports are known to emit for the
/// same metric. Checked after whitespace collapsing.
const METRIC_ALIASES: &[(&str, &str)] = &[
    (
        "C mass of forest litter and deadwood (tC/ha)",
        "C mass of forest debris (tC/ha)",
    ),
];

/// Collapse internal whitespace, trim, and fold known header variants
/// to one canonical metric name.
pub fn canonical_metric(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    for (alias, canonical) in METRIC_ALIASES {
        if collapsed == *alias {
            return (*canonical).to_string();
        }
    }
    collapsed
}

/// One dated row of metric values within a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub date: NaiveDate,
    pub values: BTreeMap<String, Decimal>,
}

/// A named scenario's dated metric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSeries {
    pub label: String,
    pub rows: Vec<MetricRow>,
}

impl ScenarioSeries {
    /// View a forecast report as a mergeable metric series, keyed by
    /// each period's reconciled sample end date.
    pub fn from_report(label: impl Into<String>, report: &ForecastReport) -> Self {
        let rows = report
            .records
            .iter()
            .map(|record| {
                let mut values = BTreeMap::new();
                values.insert("Raw Abatement".to_string(), record.raw_value);
                values.insert("Adjusted Abatement".to_string(), record.adjusted_value);
                values.insert("Cumulative Abatement".to_string(), record.cumulative_value);
                MetricRow {
                    date: record.period.sample_end.date(),
                    values,
                }
            })
            .collect();
        ScenarioSeries {
            label: label.into(),
            rows,
        }
    }

    /// Canonicalise metric names and collapse duplicate dates, keeping
    /// the later row per date (the source-export convention).
    fn prepared(&self) -> BTreeMap<NaiveDate, BTreeMap<String, Decimal>> {
        let mut by_date: BTreeMap<NaiveDate, BTreeMap<String, Decimal>> = BTreeMap::new();
        for row in &self.rows {
            let values = row
                .values
                .iter()
                .map(|(name, &value)| (canonical_metric(name), value))
                .collect();
            by_date.insert(row.date, values);
        }
        by_date
    }
}

/// One output row of the merged comparison, values aligned with
/// `MergedTable::columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    pub date: NaiveDate,
    pub values: Vec<Option<Decimal>>,
}

/// Outer-joined scenario comparison, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedTable {
    /// "<scenario> - <metric>" headers, first scenario's columns first.
    pub columns: Vec<String>,
    pub rows: Vec<MergedRow>,
}

/// Merge two scenario series: canonicalise headers, deduplicate each
/// side keeping the later row per date, outer-join on date, sort
/// ascending. Dates present on one side only leave the other side's
/// cells empty.
pub fn merge_scenarios(a: &ScenarioSeries, b: &ScenarioSeries) -> MergedTable {
    let a_rows = a.prepared();
    let b_rows = b.prepared();

    let metrics = shared_metric_order(a, b);
    let mut columns = Vec::with_capacity(metrics.len() * 2);
    for metric in &metrics {
        columns.push(format!("{} - {}", a.label, metric));
    }
    for metric in &metrics {
        columns.push(format!("{} - {}", b.label, metric));
    }

    let mut dates: Vec<NaiveDate> = a_rows.keys().chain(b_rows.keys()).copied().collect();
    dates.sort();
    dates.dedup();

    let rows = dates
        .into_iter()
        .map(|date| {
            let mut values = Vec::with_capacity(columns.len());
            for side in [&a_rows, &b_rows] {
                for metric in &metrics {
                    values.push(side.get(&date).and_then(|row| row.get(metric)).copied());
                }
            }
            MergedRow { date, values }
        })
        .collect();

    MergedTable { columns, rows }
}

/// Canonical metric order: first appearance across scenario A's rows,
/// then any B-only metrics.
fn shared_metric_order(a: &ScenarioSeries, b: &ScenarioSeries) -> Vec<String> {
    let mut metrics: Vec<String> = Vec::new();
    for row in a.rows.iter().chain(b.rows.iter()) {
        for name in row.values.keys() {
            let canonical = canonical_metric(name);
            if !metrics.contains(&canonical) {
                metrics.push(canonical);
            }
        }
    }
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(date: NaiveDate, metric: &str, value: Decimal) -> MetricRow {
        MetricRow {
            date,
            values: [(metric.to_string(), value)].into_iter().collect(),
        }
    }

    #[test]
    fn whitespace_variants_collapse_to_one_header() {
        assert_eq!(
            canonical_metric("C mass of trees  (tC/ha)"),
            "C mass of trees (tC/ha)"
        );
        assert_eq!(
            canonical_metric("C mass of forest litter and deadwood  (tC/ha)"),
            "C mass of forest debris (tC/ha)"
        );
    }

    #[test]
    fn duplicate_dates_keep_the_later_row() {
        let a = ScenarioSeries {
            label: "Baseline".into(),
            rows: vec![
                row(d(2025, 12, 31), "Stock", dec!(1.0)),
                row(d(2025, 12, 31), "Stock", dec!(2.0)),
            ],
        };
        let b = ScenarioSeries {
            label: "Project".into(),
            rows: vec![],
        };
        let merged = merge_scenarios(&a, &b);
        assert_eq!(merged.rows.len(), 1);
        assert_eq!(merged.rows[0].values[0], Some(dec!(2.0)));
    }

    #[test]
    fn outer_join_sorted_ascending() {
        let a = ScenarioSeries {
            label: "Baseline".into(),
            rows: vec![
                row(d(2026, 12, 31), "Stock", dec!(3.0)),
                row(d(2024, 12, 31), "Stock", dec!(1.0)),
            ],
        };
        let b = ScenarioSeries {
            label: "Project".into(),
            rows: vec![row(d(2025, 12, 31), "Stock", dec!(2.0))],
        };
        let merged = merge_scenarios(&a, &b);
        let dates: Vec<NaiveDate> = merged.rows.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![d(2024, 12, 31), d(2025, 12, 31), d(2026, 12, 31)]
        );
        // Project-only date leaves Baseline cells empty.
        assert_eq!(merged.rows[1].values[0], None);
        assert_eq!(merged.rows[1].values[1], Some(dec!(2.0)));
    }

    #[test]
    fn columns_pair_each_scenario_with_each_metric() {
        let a = ScenarioSeries {
            label: "Baseline".into(),
            rows: vec![row(d(2025, 12, 31), "Stock", dec!(1.0))],
        };
        let b = ScenarioSeries {
            label: "Project".into(),
            rows: vec![row(d(2025, 12, 31), "Stock", dec!(2.0))],
        };
        let merged = merge_scenarios(&a, &b);
        assert_eq!(merged.columns, vec!["Baseline - Stock", "Project - Stock"]);
    }
}
