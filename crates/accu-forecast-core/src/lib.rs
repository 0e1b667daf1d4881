pub mod adjust;
pub mod error;
pub mod forecast;
pub mod merge;
pub mod schedule;
pub mod stock;
pub mod strategy;
pub mod types;

pub use error::ForecastError;
pub use types::*;

/// Standard result type for all forecast operations
pub type ForecastResult<T> = Result<T, ForecastError>;
