use core_types::{CoreError, Frequency};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build or send the HTTP request: {0}")]
    RequestBuild(#[from] reqwest::Error),

    #[error("The data provider rejected series '{key}': {message}")]
    Provider { key: String, message: String },

    #[error("Frequency '{0}' is not supported for fetching; use m, q or a")]
    UnsupportedFrequency(Frequency),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),

    #[error("Failed to assemble the series table: {0}")]
    Table(#[from] CoreError),
}
