use crate::SeriesProvider;
use crate::error::ApiError;
use async_trait::async_trait;
use core_types::{AggregationMethod, Frequency, Observation};
use std::collections::HashMap;

/// An in-memory `SeriesProvider` serving fixed observations.
///
/// Series are returned exactly as stored, whatever frequency is requested, which
/// lets tests and offline runs exercise the repository without network access.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    series: HashMap<String, Vec<Observation>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, key: impl Into<String>, observations: Vec<Observation>) -> Self {
        self.series.insert(key.into(), observations);
        self
    }
}

#[async_trait]
impl SeriesProvider for StaticProvider {
    async fn fetch_series(
        &self,
        key: &str,
        _frequency: Frequency,
        _aggregation: AggregationMethod,
    ) -> Result<Vec<Observation>, ApiError> {
        self.series
            .get(key)
            .cloned()
            .ok_or_else(|| ApiError::Provider {
                key: key.to_string(),
                message: "series not found".to_string(),
            })
    }
}
