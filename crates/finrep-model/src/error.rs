use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinrepError {
    #[error("reporting period starts {start} after it ends {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
    #[error("no catalog configured for tab: {0}")]
    UnknownTab(String),
}

pub type Result<T> = std::result::Result<T, FinrepError>;
