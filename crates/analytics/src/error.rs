use chrono::NaiveDate;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Anchor date {0} is not present in the table's index")]
    MissingAnchorDate(NaiveDate),

    #[error("Anchor date {0} was supplied more than once")]
    DuplicateAnchorDate(NaiveDate),

    #[error("Invalid lookback period: {0}")]
    InvalidPeriod(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
