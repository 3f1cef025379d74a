use crate::error::AnalyticsError;
use chrono::{Months, NaiveDate};
use core_types::{Column, ColumnMeta, DateTable, Frequency, Lookback, OffsetTable};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A stateless calculator for the time-series transforms.
///
/// Every method takes its input table by reference and returns a new table.
#[derive(Debug, Default)]
pub struct TimeSeriesTransformer {}

impl TimeSeriesTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rows dated `start <= date <= end`, inclusive on both ends.
    pub fn filter_by_date(&self, table: &DateTable, start: NaiveDate, end: NaiveDate) -> DateTable {
        table.slice(start, end)
    }

    /// Drops every row in which at least one column is missing.
    pub fn drop_incomplete_rows(&self, table: &DateTable) -> DateTable {
        let keep: Vec<usize> = (0..table.len())
            .filter(|&row| table.columns().iter().all(|c| c.values[row].is_some()))
            .collect();
        table.select_rows(&keep)
    }

    /// Rebases every column to 100 at the table's first row.
    ///
    /// A column whose first cell is missing or zero becomes entirely missing.
    pub fn index_to_first(&self, table: &DateTable) -> DateTable {
        table.map_columns(|column| {
            let base = column.values.first().copied().flatten();
            Column::new(
                column.meta.clone(),
                column.values.iter().map(|v| rebase(*v, base)).collect(),
            )
        })
    }

    /// Calculates annualized rates of change for one or more lookback periods.
    ///
    /// # Arguments
    ///
    /// * `table` - The input series, sampled at `frequency`.
    /// * `frequency` - Sampling frequency of `table`; sets the periods per year.
    /// * `periods` - Lookbacks in rows of `table`, e.g. `[1, 3, 12]` for monthly data.
    ///
    /// # Returns
    ///
    /// A table with the same index and one column per (period, input column), grouped
    /// by period in request order. Each cell is
    /// `(v[t] / v[t - period]) ^ (periods_per_year / period) - 1`; rows without
    /// enough history are missing rather than filled.
    pub fn annualized_change(
        &self,
        table: &DateTable,
        frequency: Frequency,
        periods: &[u32],
    ) -> Result<DateTable, AnalyticsError> {
        if periods.is_empty() {
            return Err(AnalyticsError::InvalidPeriod(
                "at least one period is required".to_string(),
            ));
        }
        if periods.contains(&0) {
            return Err(AnalyticsError::InvalidPeriod(
                "periods must be positive".to_string(),
            ));
        }

        let periods_per_year = frequency.periods_per_year();
        let mut columns = Vec::with_capacity(periods.len() * table.width());

        for &period in periods {
            let exponent = Exponent::new(periods_per_year, period);
            let lag = period as usize;

            for column in table.columns() {
                let values = (0..column.values.len())
                    .map(|t| {
                        let current = column.values[t]?;
                        let previous = column.values[t.checked_sub(lag)?]?;
                        annualize(current, previous, exponent)
                    })
                    .collect();
                let meta = column.meta.clone().with_lookback(Lookback { periods: period, frequency });
                columns.push(Column::new(meta, values));
            }
        }

        tracing::debug!(
            rows = table.len(),
            columns = columns.len(),
            ?periods,
            %frequency,
            "Computed annualized changes"
        );
        Ok(DateTable::new(table.index().to_vec(), columns)?)
    }

    /// Indexes every column to 100 at each anchor date and lines the windows up by offset.
    ///
    /// For each anchor, the window runs from `anchor - window_months` to
    /// `anchor + window_months`, clipped to the table's first and last dates. Rows are
    /// re-keyed by position starting at `-window_months`, so the offset counts rows,
    /// not elapsed months; clipped or irregular windows shift accordingly. All anchors'
    /// windows are outer-joined on the offset, leaving gaps where a window is shorter.
    pub fn indexed_performance_around_dates(
        &self,
        table: &DateTable,
        anchors: &[NaiveDate],
        window_months: u32,
    ) -> Result<OffsetTable, AnalyticsError> {
        let mut seen = HashSet::new();
        let mut windows = Vec::with_capacity(anchors.len());

        for &anchor in anchors {
            if !seen.insert(anchor) {
                return Err(AnalyticsError::DuplicateAnchorDate(anchor));
            }
            let anchor_row = table
                .position(anchor)
                .ok_or(AnalyticsError::MissingAnchorDate(anchor))?;
            let (Some(first), Some(last)) = (table.first_key(), table.last_key()) else {
                return Err(AnalyticsError::MissingAnchorDate(anchor));
            };

            let months = Months::new(window_months);
            let start = anchor
                .checked_sub_months(months)
                .map_or(first, |d| d.max(first));
            let end = anchor
                .checked_add_months(months)
                .map_or(last, |d| d.min(last));

            let mut bases = table.columns().iter().map(|c| c.values[anchor_row]);
            let window = table.slice(start, end).map_columns(|column| {
                let base = bases.next().flatten();
                Column::new(
                    column.meta.clone().with_anchor(anchor),
                    column.values.iter().map(|v| rebase(*v, base)).collect(),
                )
            });

            let offsets: Vec<i64> = (0..window.len() as i64)
                .map(|row| row - i64::from(window_months))
                .collect();

            tracing::debug!(
                %anchor,
                %start,
                %end,
                rows = window.len(),
                "Indexed window around anchor"
            );
            windows.push(window.rekey(offsets)?);
        }

        Ok(OffsetTable::outer_join(windows))
    }

    /// Averages the indexed performance across anchors, one column per indicator.
    ///
    /// Rows are first averaged per offset, then the columns belonging to the same
    /// indicator are averaged cell by cell. Missing contributors are ignored, so an
    /// offset reached by only some anchors averages over those anchors alone.
    pub fn averaged_indexed_performance(
        &self,
        table: &DateTable,
        anchors: &[NaiveDate],
        window_months: u32,
    ) -> Result<OffsetTable, AnalyticsError> {
        let indexed = self.indexed_performance_around_dates(table, anchors, window_months)?;
        let by_offset = mean_rows_by_offset(&indexed)?;

        // Group on the column identity minus its anchor tag, in first-seen order.
        let mut groups: Vec<(ColumnMeta, Vec<&Column>)> = Vec::new();
        for column in by_offset.columns() {
            let identity = column.meta.without_anchor();
            match groups.iter_mut().find(|(meta, _)| *meta == identity) {
                Some((_, members)) => members.push(column),
                None => groups.push((identity, vec![column])),
            }
        }

        let columns = groups
            .into_iter()
            .map(|(meta, members)| {
                let values = (0..by_offset.len())
                    .map(|row| mean(members.iter().map(|c| c.values[row])))
                    .collect();
                Column::new(meta, values)
            })
            .collect();

        Ok(OffsetTable::new(by_offset.index().to_vec(), columns)?)
    }
}

/// Averages every column over the rows that share an offset.
fn mean_rows_by_offset(table: &OffsetTable) -> Result<OffsetTable, AnalyticsError> {
    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (row, offset) in table.index().iter().enumerate() {
        groups.entry(*offset).or_default().push(row);
    }

    let columns = table
        .columns()
        .iter()
        .map(|column| {
            let values = groups
                .values()
                .map(|rows| mean(rows.iter().map(|&row| column.values[row])))
                .collect();
            Column::new(column.meta.clone(), values)
        })
        .collect();

    Ok(OffsetTable::new(groups.into_keys().collect(), columns)?)
}

/// Mean of the present values; `None` when nothing is present or the sum overflows.
fn mean<I>(values: I) -> Option<Decimal>
where
    I: Iterator<Item = Option<Decimal>>,
{
    let mut sum = Decimal::ZERO;
    let mut count = 0u32;
    for value in values.flatten() {
        sum = sum.checked_add(value)?;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    sum.checked_div(Decimal::from(count))
}

/// `value / base * 100`, missing when either side is missing, the base is zero,
/// or the result overflows.
fn rebase(value: Option<Decimal>, base: Option<Decimal>) -> Option<Decimal> {
    value?.checked_div(base?)?.checked_mul(HUNDRED)
}

/// The power a single-period growth factor is raised to.
#[derive(Debug, Clone, Copy)]
enum Exponent {
    Integer(i64),
    Fractional(Decimal),
}

impl Exponent {
    fn new(periods_per_year: u32, period: u32) -> Self {
        if periods_per_year % period == 0 {
            Exponent::Integer(i64::from(periods_per_year / period))
        } else {
            Exponent::Fractional(Decimal::from(periods_per_year) / Decimal::from(period))
        }
    }
}

fn annualize(current: Decimal, previous: Decimal, exponent: Exponent) -> Option<Decimal> {
    let growth = current.checked_div(previous)?;
    let annual = match exponent {
        Exponent::Integer(power) => growth.checked_powi(power)?,
        Exponent::Fractional(power) if growth > Decimal::ZERO => growth.checked_powd(power)?,
        Exponent::Fractional(_) => return None,
    };
    annual.checked_sub(Decimal::ONE)
}
