//! Post-strategy adjustment pipeline.
//!
//! Fixed step order: CO2e conversion, area scaling, permanence
//! discount, first-period deduction. Area scaling must precede any
//! discount logic that is sensitive to per-hectare vs total units, so
//! the order is not configurable.

use rust_decimal::Decimal;

use crate::strategy::RawAbatement;
use crate::types::{CarbonMass, StrategyConfig};

/// Run a raw strategy value through the pipeline. Each step is the
/// identity when its option is unset; steps a strategy pre-applied
/// (per the flags on `raw`) are skipped rather than applied twice.
pub fn apply(raw: &RawAbatement, period_index: usize, config: &StrategyConfig) -> CarbonMass {
    let mut value = raw.value;

    if let Some(factor) = config.co2e_factor {
        value *= factor;
    }

    if let Some(area) = config.area_ha {
        value *= area;
    }

    if !raw.discount_applied && config.permanence_discount != Decimal::ONE {
        value *= config.permanence_discount;
    }

    if period_index == 0 && !raw.first_deduction_applied {
        if let Some(deduction) = config.first_period_deduction {
            value -= deduction;
        }
    }

    value
}
