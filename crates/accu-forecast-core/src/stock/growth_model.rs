use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::schedule::DEFAULT_GROWTH_MONTHS;
use crate::types::CarbonMass;
use crate::ForecastResult;

fn default_months_to_maturity() -> u32 {
    DEFAULT_GROWTH_MONTHS
}

/// Parametric carbon pool: linear interpolation from a baseline stock
/// to the long-term stock over a fixed month count, saturating at the
/// long-term value.
///
///   CP(m) = CBASE + (m / M) × (CLT − CBASE),  m clamped to [0, M]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthModel {
    /// Net baseline carbon stock (CBASE).
    pub cbase: CarbonMass,
    /// Predicted long-term carbon stock (CLT).
    pub clt: CarbonMass,
    /// Months to reach the long-term stock (M).
    #[serde(default = "default_months_to_maturity")]
    pub months_to_maturity: u32,
}

impl GrowthModel {
    pub fn new(cbase: CarbonMass, clt: CarbonMass, months_to_maturity: u32) -> ForecastResult<Self> {
        if months_to_maturity == 0 {
            return Err(ForecastError::ArithmeticInconsistency(
                "months_to_maturity must be greater than 0".into(),
            ));
        }
        if clt == cbase {
            return Err(ForecastError::ArithmeticInconsistency(
                "CLT equals CBASE; the growth rate is undefined".into(),
            ));
        }
        Ok(GrowthModel {
            cbase,
            clt,
            months_to_maturity,
        })
    }

    /// Carbon pool value after `months` whole months since inception.
    /// Total for all inputs; saturates at CLT past maturity and at
    /// CBASE before inception.
    pub fn cp_at(&self, months: i64) -> CarbonMass {
        let m = i64::from(self.months_to_maturity);
        let n = months.clamp(0, m);
        // Multiply before dividing so exact month fractions stay exact.
        self.cbase + Decimal::from(n) * (self.clt - self.cbase) / Decimal::from(m)
    }
}
