use clap::Args;
use serde_json::{json, Map, Value};

use accu_forecast_core::merge::{merge_scenarios, MergedTable};

use crate::input;

/// Arguments for the merge command
#[derive(Args)]
pub struct MergeArgs {
    /// First scenario CSV (date column first, one column per metric)
    #[arg(long)]
    pub left: String,

    /// Second scenario CSV
    #[arg(long)]
    pub right: String,

    /// Column-header label for the first scenario
    #[arg(long, default_value = "Baseline")]
    pub left_label: String,

    /// Column-header label for the second scenario
    #[arg(long, default_value = "Project")]
    pub right_label: String,
}

pub fn run_merge(args: MergeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let left = input::stocks::read_scenario_csv(&args.left, &args.left_label)?;
    let right = input::stocks::read_scenario_csv(&args.right, &args.right_label)?;
    let merged = merge_scenarios(&left, &right);
    Ok(merged_value(&merged))
}

/// One JSON object per merged row, dates first, so the array renders
/// directly as a table or CSV. Cells absent on one side stay null.
fn merged_value(merged: &MergedTable) -> Value {
    let rows: Vec<Value> = merged
        .rows
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            obj.insert("date".to_string(), json!(row.date.to_string()));
            for (column, value) in merged.columns.iter().zip(&row.values) {
                obj.insert(
                    column.clone(),
                    value.map_or(Value::Null, |v| json!(v)),
                );
            }
            Value::Object(obj)
        })
        .collect();

    json!({ "records": rows })
}
