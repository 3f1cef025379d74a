use crate::SeriesProvider;
use crate::error::ApiError;
use chrono::NaiveDate;
use core_types::{AggregationMethod, ColumnMeta, DateTable, Frequency, Indicator, Observation};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// The `SeriesRepository` turns a set of indicators into one joined, date-indexed
/// table. It encapsulates all provider access; nothing is cached, so every call
/// goes back to the provider.
#[derive(Debug, Clone)]
pub struct SeriesRepository<P> {
    provider: P,
}

impl<P: SeriesProvider> SeriesRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Fetches every indicator and outer-joins them on their period-end dates.
    ///
    /// Each series is resampled to the end of its period and exact zeros are
    /// dropped, since the provider uses them as missing-data sentinels. Columns
    /// appear in the order of `indicators`.
    pub async fn fetch(
        &self,
        indicators: &[Indicator],
        frequency: Frequency,
        aggregation: AggregationMethod,
    ) -> Result<DateTable, ApiError> {
        if !matches!(
            frequency,
            Frequency::Monthly | Frequency::Quarterly | Frequency::Annual
        ) {
            return Err(ApiError::UnsupportedFrequency(frequency));
        }

        let mut tables = Vec::with_capacity(indicators.len());
        for indicator in indicators {
            let observations = self
                .provider
                .fetch_series(&indicator.key, frequency, aggregation)
                .await?;
            let resampled = resample_to_period_end(observations, frequency);
            let total = resampled.len();
            let points: Vec<_> = resampled
                .into_iter()
                .filter(|(_, value)| *value != Some(Decimal::ZERO))
                .collect();

            tracing::debug!(
                series = %indicator.key,
                name = %indicator.name,
                rows = points.len(),
                dropped_zeros = total - points.len(),
                "Fetched series"
            );

            let meta = ColumnMeta::for_indicator(indicator.clone());
            tables.push(DateTable::from_points(meta, points)?);
        }

        let table = DateTable::outer_join(tables);
        tracing::info!(
            rows = table.len(),
            columns = table.width(),
            first = ?table.first_key(),
            last = ?table.last_key(),
            "Joined indicator table"
        );
        Ok(table)
    }
}

/// Buckets observations into consecutive periods ending on period-end dates.
///
/// The last non-missing observation in a period wins. Periods between the first and
/// last observation that received no value become missing cells.
pub fn resample_to_period_end(
    mut observations: Vec<Observation>,
    frequency: Frequency,
) -> Vec<(NaiveDate, Option<Decimal>)> {
    observations.sort_by_key(|o| o.date);

    let mut buckets: BTreeMap<NaiveDate, Option<Decimal>> = BTreeMap::new();
    for observation in observations {
        let slot = buckets
            .entry(frequency.period_end(observation.date))
            .or_insert(None);
        if observation.value.is_some() {
            *slot = observation.value;
        }
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    let mut resampled = Vec::with_capacity(buckets.len());
    let mut period = first;
    while period <= last {
        resampled.push((period, buckets.get(&period).copied().flatten()));
        match frequency.next_period_end(period) {
            Some(next) => period = next,
            None => break,
        }
    }
    resampled
}
