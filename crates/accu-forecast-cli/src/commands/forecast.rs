use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use accu_forecast_core::forecast;
use accu_forecast_core::schedule::PeriodRequest;
use accu_forecast_core::stock::{GrowthModel, StockSeries, TableStockSeries};
use accu_forecast_core::strategy::{DeductionSource, Strategy, TableDeductions};
use accu_forecast_core::types::{ForecastReport, StrategyConfig};

use crate::input;

/// Strategy selection as it appears in the JSON request file.
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategySpec {
    Delta,
    NetWithDeduction,
    ParametricGrowth {
        cbase: Decimal,
        clt: Decimal,
        #[serde(default = "default_maturity")]
        months_to_maturity: u32,
        inception: NaiveDate,
    },
}

fn default_maturity() -> u32 {
    accu_forecast_core::schedule::DEFAULT_GROWTH_MONTHS
}

#[derive(Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// The full forecast request file.
#[derive(Deserialize)]
pub struct ForecastInput {
    pub periods: PeriodRequest,
    pub strategy: StrategySpec,
    #[serde(default)]
    pub config: Option<StrategyConfig>,
    /// Inline stock rows; a `--stocks` CSV takes precedence.
    #[serde(default)]
    pub stocks: Vec<DatedValue>,
    /// Per-period deductions keyed by reconciled period end date.
    #[serde(default)]
    pub deductions: Vec<DatedValue>,
}

/// Arguments for the forecast command
#[derive(Args)]
pub struct ForecastArgs {
    /// Path to JSON request file (otherwise read from stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a (date, value) stock CSV, overriding inline stock rows
    #[arg(long)]
    pub stocks: Option<String>,
}

pub fn run_forecast(args: ForecastArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ForecastInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for forecast".into());
    };

    let series: Option<TableStockSeries> = if let Some(ref path) = args.stocks {
        Some(input::stocks::read_stock_csv(path)?)
    } else if request.stocks.is_empty() {
        None
    } else {
        Some(TableStockSeries::new(
            request.stocks.iter().map(|r| (r.date, r.value)),
        ))
    };

    let config = request.config.unwrap_or_default();
    let deductions = (!request.deductions.is_empty()).then(|| {
        TableDeductions::new(request.deductions.iter().map(|r| (r.date, r.value)))
    });

    let strategy = match request.strategy {
        StrategySpec::Delta => Strategy::Delta,
        StrategySpec::NetWithDeduction => Strategy::NetWithDeduction {
            deductions: deductions.as_ref().map(|d| d as &dyn DeductionSource),
        },
        StrategySpec::ParametricGrowth {
            cbase,
            clt,
            months_to_maturity,
            inception,
        } => Strategy::ParametricGrowth {
            model: GrowthModel::new(cbase, clt, months_to_maturity)?,
            inception,
        },
    };

    let report = forecast::run(
        &request.periods,
        &strategy,
        series.as_ref().map(|s| s as &dyn StockSeries),
        &config,
    )?;

    Ok(report_value(&report))
}

/// Flatten the report into one row per period plus a summary, so the
/// table and CSV formatters produce the familiar export layout.
fn report_value(report: &ForecastReport) -> Value {
    let records: Vec<Value> = report
        .records
        .iter()
        .map(|r| {
            json!({
                "period": r.period.label,
                "start": r.period.nominal_start.to_string(),
                "end": r.period.nominal_end.to_string(),
                "sample_date": r.period.sample_end.to_string(),
                "raw_abatement": r.raw_value,
                "adjusted_abatement": r.adjusted_value,
                "cumulative_abatement": r.cumulative_value,
            })
        })
        .collect();

    json!({
        "records": records,
        "result": {
            "periods": report.records.len(),
            "total_abatement": report.total(),
        },
    })
}
