use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use configuration::FredConfig;
use core_types::{AggregationMethod, Frequency, Observation};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

pub mod error;
pub mod fixture;
pub mod repository;
pub mod responses;
// --- Public API ---
pub use fixture::StaticProvider;
pub use repository::SeriesRepository;
pub use responses::{ApiErrorResponse, ObservationsResponse, RawObservation};

/// The minimal capability the repository needs from an economic data source.
/// Implementations can be swapped (live HTTP or in-memory fixture) without the
/// repository or the transforms noticing.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetches the raw observations of one series, aggregated to `frequency`.
    async fn fetch_series(
        &self,
        key: &str,
        frequency: Frequency,
        aggregation: AggregationMethod,
    ) -> Result<Vec<Observation>, ApiError>;
}

/// A concrete implementation of the `SeriesProvider` for the FRED API.
///
/// The client owns its credential; callers construct one explicitly and hand it
/// to a `SeriesRepository`.
#[derive(Clone)]
pub struct FredClient {
    client: reqwest::Client,
    base_url: String,

    api_key: String,
}

impl FredClient {
    pub fn new(config: &FredConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),

            api_key: config.api_key.clone(),
        })
    }

    /// The provider's code for a frequency: FRED uses `a` for annual.
    fn frequency_param(frequency: Frequency) -> &'static str {
        match frequency {
            Frequency::Daily => "d",
            Frequency::Weekly => "w",
            Frequency::Monthly => "m",
            Frequency::Quarterly => "q",
            Frequency::Annual => "a",
        }
    }
}

#[async_trait]
impl SeriesProvider for FredClient {
    async fn fetch_series(
        &self,
        key: &str,
        frequency: Frequency,
        aggregation: AggregationMethod,
    ) -> Result<Vec<Observation>, ApiError> {
        let url = format!("{}/fred/series/observations", self.base_url);
        tracing::debug!(series = key, %frequency, %aggregation, "Requesting FRED series");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("series_id", key),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("frequency", Self::frequency_param(frequency)),
                ("aggregation_method", aggregation.code()),
            ])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let body = serde_json::from_str::<ObservationsResponse>(&text)
                .map_err(|e| ApiError::Deserialization(e.to_string()))?;
            parse_observations(body.observations)
        } else {
            let message = match serde_json::from_str::<ApiErrorResponse>(&text) {
                Ok(api_error) => format!("{} ({})", api_error.error_message, api_error.error_code),
                Err(_) => format!("HTTP {}: {}", status, text),
            };
            Err(ApiError::Provider {
                key: key.to_string(),
                message,
            })
        }
    }
}

/// Converts the provider's string rows into typed observations.
///
/// A value of `"."` is the provider's missing-data marker and becomes `None`.
pub fn parse_observations(raw: Vec<RawObservation>) -> Result<Vec<Observation>, ApiError> {
    raw.into_iter()
        .map(|row| {
            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
                .map_err(|e| ApiError::InvalidData(format!("Invalid date '{}': {}", row.date, e)))?;
            let value = match row.value.trim() {
                "." | "" => None,
                text => Some(Decimal::from_str(text).map_err(|e| {
                    ApiError::Deserialization(format!("Invalid value '{}' on {}: {}", text, row.date, e))
                })?),
            };
            Ok(Observation { date, value })
        })
        .collect()
}
