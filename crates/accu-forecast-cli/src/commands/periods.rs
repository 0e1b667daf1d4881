use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use accu_forecast_core::schedule::{
    generate_periods, PeriodConvention, PeriodRequest, DEFAULT_GROWTH_MONTHS,
};

#[derive(Debug, Clone, ValueEnum)]
pub enum ConventionArg {
    Calendar,
    Financial,
    Fixed,
}

/// Arguments for the periods command
#[derive(Args)]
pub struct PeriodsArgs {
    /// Reporting-period convention
    #[arg(long, value_enum)]
    pub convention: ConventionArg,

    /// Declared project or reporting start date (e.g. 2023-09-10)
    #[arg(long)]
    pub start: NaiveDate,

    /// Number of periods (years for the annual conventions)
    #[arg(long)]
    pub horizon: u32,

    /// Period length in months (fixed convention only)
    #[arg(long)]
    pub length_months: Option<u32>,
}

/// Dry-run the period generator: show the sequence a forecast would
/// use, with both nominal and reconciled sample dates.
pub fn run_periods(args: PeriodsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let convention = match args.convention {
        ConventionArg::Calendar => PeriodConvention::CalendarYear,
        ConventionArg::Financial => PeriodConvention::FinancialYear {
            anchor_days: vec![1, 2],
        },
        ConventionArg::Fixed => PeriodConvention::FixedMonths {
            length_months: args
                .length_months
                .ok_or("--length-months is required with --convention fixed")?,
            max_elapsed_months: DEFAULT_GROWTH_MONTHS,
        },
    };

    let request = PeriodRequest {
        convention,
        start_date: args.start,
        horizon: args.horizon,
    };
    let periods = generate_periods(&request, None)?;

    let rows: Vec<Value> = periods
        .iter()
        .map(|p| {
            json!({
                "period": p.label,
                "nominal_start": p.nominal_start.to_string(),
                "nominal_end": p.nominal_end.to_string(),
                "sample_start": p.sample_start.to_string(),
                "sample_end": p.sample_end.to_string(),
            })
        })
        .collect();

    Ok(json!({ "records": rows }))
}
