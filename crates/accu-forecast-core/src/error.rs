use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Invalid configuration: {field} — {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("No stock observation at {date}")]
    ObservationNotFound { date: NaiveDate },

    #[error("No deduction entry for period ending {date}")]
    DeductionNotFound { date: NaiveDate },

    #[error("Arithmetic inconsistency: {0}")]
    ArithmeticInconsistency(String),

    #[error("Reporting period {index}: {source}")]
    Period {
        index: usize,
        #[source]
        source: Box<ForecastError>,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ForecastError {
    /// Attach the reporting-period index to an error surfaced mid-report.
    pub fn in_period(self, index: usize) -> Self {
        ForecastError::Period {
            index,
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(e: serde_json::Error) -> Self {
        ForecastError::SerializationError(e.to_string())
    }
}
