mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::forecast::ForecastArgs;
use commands::merge::MergeArgs;
use commands::periods::PeriodsArgs;

/// ACCU abatement forecasting over reconciled reporting periods
#[derive(Parser)]
#[command(
    name = "accuf",
    version,
    about = "ACCU abatement forecasting over reconciled reporting periods",
    long_about = "Forecasts Australian Carbon Credit Unit abatement from carbon-stock \
                  model exports or a parametric growth curve, with decimal precision. \
                  Supports calendar-year, financial-year and fixed-length reporting \
                  periods, crediting adjustments, and side-by-side scenario comparison."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an abatement forecast from a stock series or growth model
    Forecast(ForecastArgs),
    /// Generate the reporting-period sequence without calculating
    Periods(PeriodsArgs),
    /// Merge two scenario exports into one comparison table
    Merge(MergeArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Forecast(args) => commands::forecast::run_forecast(args),
        Commands::Periods(args) => commands::periods::run_periods(args),
        Commands::Merge(args) => commands::merge::run_merge(args),
        Commands::Version => {
            println!("accuf {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
