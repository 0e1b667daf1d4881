use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

use accu_forecast_core::merge::{MetricRow, ScenarioSeries};
use accu_forecast_core::stock::TableStockSeries;

/// Date formats the spreadsheet exports are known to emit. Day-first
/// formats come before month-first ones; the exports are Australian.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y"];

/// Parse a date cell, trying each known export format in turn.
pub fn parse_date(cell: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    let trimmed = cell.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    Err(format!("Unrecognised date '{trimmed}' (expected e.g. 2025-06-30 or 30/06/2025)").into())
}

fn parse_value(cell: &str, line: usize) -> Result<Decimal, Box<dyn std::error::Error>> {
    Decimal::from_str(cell.trim().trim_start_matches('$').replace(',', "").as_str())
        .map_err(|e| format!("Bad numeric value '{}' on line {}: {}", cell.trim(), line, e).into())
}

/// Read a two-column (date, value) stock CSV into an indexed series.
/// A header row is detected by its unparseable first cell and skipped.
pub fn read_stock_csv(path: &str) -> Result<TableStockSeries, Box<dyn std::error::Error>> {
    let canonical = super::file::resolve_path(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let mut rows: Vec<(NaiveDate, Decimal)> = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let Some(date_cell) = record.get(0) else {
            continue;
        };
        let Ok(date) = parse_date(date_cell) else {
            if line == 0 {
                continue; // header row
            }
            return Err(
                format!("Unrecognised date '{}' on line {}", date_cell.trim(), line + 1).into(),
            );
        };
        let value_cell = record
            .get(1)
            .ok_or_else(|| format!("Missing value column on line {}", line + 1))?;
        rows.push((date, parse_value(value_cell, line + 1)?));
    }

    if rows.is_empty() {
        return Err(format!("No stock rows found in '{}'", canonical.display()).into());
    }
    Ok(TableStockSeries::new(rows))
}

/// Read a wide metric CSV (date column first, one column per metric)
/// into a named scenario series for merging. Empty cells are skipped.
pub fn read_scenario_csv(
    path: &str,
    label: &str,
) -> Result<ScenarioSeries, Box<dyn std::error::Error>> {
    let canonical = super::file::resolve_path(path)?;
    let mut reader = csv::Reader::from_path(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.len() < 2 {
        return Err(format!(
            "'{}' needs a date column plus at least one metric column",
            canonical.display()
        )
        .into());
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let date_cell = record
            .get(0)
            .ok_or_else(|| format!("Missing date column on line {}", line + 2))?;
        let date = parse_date(date_cell)
            .map_err(|e| format!("Line {}: {}", line + 2, e))?;

        let mut values = BTreeMap::new();
        for (metric, cell) in headers.iter().skip(1).zip(record.iter().skip(1)) {
            if cell.trim().is_empty() {
                continue;
            }
            values.insert(metric.clone(), parse_value(cell, line + 2)?);
        }
        rows.push(MetricRow { date, values });
    }

    Ok(ScenarioSeries {
        label: label.to_string(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_iso_and_day_first_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert_eq!(parse_date("2025-06-30").unwrap(), expected);
        assert_eq!(parse_date("30/06/2025").unwrap(), expected);
        assert_eq!(parse_date("30-06-2025").unwrap(), expected);
        assert_eq!(parse_date(" 30/06/25 ").unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_date_shapes() {
        assert!(parse_date("June 30, 2025?").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn strips_currency_noise_from_values() {
        assert_eq!(parse_value("1,234.5", 1).unwrap(), dec!(1234.5));
        assert_eq!(parse_value(" $42 ", 1).unwrap(), dec!(42));
        assert!(parse_value("n/a", 1).is_err());
    }
}
