use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::ForecastResult;

/// Carbon mass or CO2-equivalent quantities. Wraps Decimal to prevent
/// accidental f64 usage.
pub type CarbonMass = Decimal;

/// Multiplicative factors (discounts, conversion ratios).
pub type Factor = Decimal;

/// A date at which the external stock source records a value. Always an
/// end-of-month date under the upstream sampling convention.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SampleDate(NaiveDate);

impl SampleDate {
    pub fn new(date: NaiveDate) -> Self {
        SampleDate(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for SampleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for SampleDate {
    fn from(date: NaiveDate) -> Self {
        SampleDate(date)
    }
}

/// A single stock value recorded by the external source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockObservation {
    pub date: SampleDate,
    pub value: CarbonMass,
}

/// One reporting period in a generated sequence. Immutable once built.
///
/// `sample_start`/`sample_end` are the reconciled lookup dates; because
/// every boundary is shifted one day back, the sample interval of each
/// period shares its start with the previous period's end. That overlap
/// is the intended convention, not a defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub index: usize,
    pub nominal_start: NaiveDate,
    pub nominal_end: NaiveDate,
    pub sample_start: SampleDate,
    pub sample_end: SampleDate,
    pub label: String,
}

/// Per-period forecast output, in increasing index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbatementRecord {
    pub period: ReportingPeriod,
    /// Strategy output before the adjustment pipeline.
    pub raw_value: CarbonMass,
    /// Value after CO2e conversion, area scaling, discounting and any
    /// first-period deduction.
    pub adjusted_value: CarbonMass,
    /// Running sum of adjusted values from period 0 to here.
    pub cumulative_value: CarbonMass,
    /// True when the strategy already applied the permanence discount;
    /// the pipeline must not apply it again.
    pub discount_applied: bool,
    /// True when the strategy already applied the first-period deduction.
    pub first_deduction_applied: bool,
}

/// Crediting configuration, constructed once per run and passed down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Fixed stock override for the period-0 differencing base.
    #[serde(default)]
    pub base_year_value: Option<Decimal>,
    /// Explicitly request the first observation as the period-0 base.
    /// Conflicts with `base_year_value`.
    #[serde(default)]
    pub use_first_observation: bool,
    /// Fraction of each raw delta deducted before crediting, when no
    /// per-period deduction table is supplied.
    #[serde(default)]
    pub deduction_rate: Option<Decimal>,
    /// Mass-to-CO2e conversion factor (44/12 for tonnes of carbon).
    /// None means values are already CO2e.
    #[serde(default)]
    pub co2e_factor: Option<Decimal>,
    /// Project area when source values are per-hectare. None means
    /// values are already totals.
    #[serde(default)]
    pub area_ha: Option<Decimal>,
    /// Permanence-period discount in (0, 1]. 1.0 disables it.
    #[serde(default = "default_permanence_discount")]
    pub permanence_discount: Factor,
    /// Flat credit amount subtracted once, at period 0 only.
    #[serde(default)]
    pub first_period_deduction: Option<Decimal>,
}

fn default_permanence_discount() -> Decimal {
    Decimal::ONE
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            base_year_value: None,
            use_first_observation: false,
            deduction_rate: None,
            co2e_factor: None,
            area_ha: None,
            permanence_discount: Decimal::ONE,
            first_period_deduction: None,
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> ForecastResult<()> {
        if self.base_year_value.is_some() && self.use_first_observation {
            return Err(ForecastError::InvalidConfig {
                field: "base_year_value".into(),
                reason: "conflicts with use_first_observation; set one or the other".into(),
            });
        }
        if self.permanence_discount <= Decimal::ZERO || self.permanence_discount > Decimal::ONE {
            return Err(ForecastError::InvalidConfig {
                field: "permanence_discount".into(),
                reason: "must be in (0, 1]".into(),
            });
        }
        if let Some(rate) = self.deduction_rate {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(ForecastError::InvalidConfig {
                    field: "deduction_rate".into(),
                    reason: "must be in [0, 1]".into(),
                });
            }
        }
        if let Some(area) = self.area_ha {
            if area <= Decimal::ZERO {
                return Err(ForecastError::InvalidConfig {
                    field: "area_ha".into(),
                    reason: "must be positive".into(),
                });
            }
        }
        Ok(())
    }
}

/// Final ordered forecast, ready for external emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub records: Vec<AbatementRecord>,
}

impl ForecastReport {
    /// Total adjusted credits across the whole sequence.
    pub fn total(&self) -> CarbonMass {
        self.records
            .last()
            .map(|r| r.cumulative_value)
            .unwrap_or(Decimal::ZERO)
    }
}
