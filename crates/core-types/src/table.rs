use crate::error::CoreError;
use crate::structs::{Column, ColumnMeta};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Debug;

/// A calendar-indexed table, as produced by the repository and date transforms.
pub type DateTable = TimeSeriesTable<NaiveDate>;

/// A table keyed by a relative row offset around an anchor.
pub type OffsetTable = TimeSeriesTable<i64>;

/// An ordered, column-oriented table of optional decimal values.
///
/// The index is strictly increasing, so no two rows share a key, and every column
/// holds exactly one cell per index entry. A `None` cell is a missing observation.
/// Tables are never mutated in place by the transforms; each one returns a new table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesTable<K> {
    index: Vec<K>,
    columns: Vec<Column>,
}

impl<K> Default for TimeSeriesTable<K> {
    fn default() -> Self {
        Self {
            index: Vec::new(),
            columns: Vec::new(),
        }
    }
}

impl<K: Ord + Copy + Debug> TimeSeriesTable<K> {
    /// Builds a table, validating the index ordering and the column lengths.
    pub fn new(index: Vec<K>, columns: Vec<Column>) -> Result<Self, CoreError> {
        if let Some(pair) = index.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CoreError::InvalidIndex(format!(
                "keys must be strictly increasing, found {:?} followed by {:?}",
                pair[0], pair[1]
            )));
        }
        for column in &columns {
            if column.values.len() != index.len() {
                return Err(CoreError::ColumnLength {
                    label: column.label(),
                    expected: index.len(),
                    actual: column.values.len(),
                });
            }
        }
        Ok(Self { index, columns })
    }

    /// Builds a single-column table from keyed points, sorting them by key.
    ///
    /// Duplicate keys are rejected.
    pub fn from_points(
        meta: ColumnMeta,
        mut points: Vec<(K, Option<Decimal>)>,
    ) -> Result<Self, CoreError> {
        points.sort_by_key(|(key, _)| *key);
        let (index, values): (Vec<K>, Vec<Option<Decimal>>) = points.into_iter().unzip();
        Self::new(index, vec![Column::new(meta, values)])
    }

    pub fn index(&self) -> &[K] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn first_key(&self) -> Option<K> {
        self.index.first().copied()
    }

    pub fn last_key(&self) -> Option<K> {
        self.index.last().copied()
    }

    /// Row position of `key`, if the index contains it exactly.
    pub fn position(&self, key: K) -> Option<usize> {
        self.index.binary_search(&key).ok()
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(Column::label).collect()
    }

    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.label() == label)
    }

    /// The cell at `key` in the column labelled `label`.
    pub fn value(&self, key: K, label: &str) -> Option<Decimal> {
        let row = self.position(key)?;
        self.column(label)?.values[row]
    }

    /// The rows with `start <= key <= end`. Empty when the bounds select nothing.
    pub fn slice(&self, start: K, end: K) -> Self {
        let from = self.index.partition_point(|k| *k < start);
        let to = self.index.partition_point(|k| *k <= end).max(from);
        self.take_rows(from, to)
    }

    /// The rows in positions `from..to`.
    pub fn take_rows(&self, from: usize, to: usize) -> Self {
        Self {
            index: self.index[from..to].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.meta.clone(), c.values[from..to].to_vec()))
                .collect(),
        }
    }

    /// The rows at `positions`, which must be strictly increasing.
    ///
    /// # Panics
    ///
    /// Panics if a position is out of bounds.
    pub fn select_rows(&self, positions: &[usize]) -> Self {
        debug_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        Self {
            index: positions.iter().map(|&row| self.index[row]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.meta.clone(), positions.iter().map(|&row| c.values[row]).collect()))
                .collect(),
        }
    }

    /// Replaces the index with `index`, keeping the columns positionally.
    pub fn rekey<J: Ord + Copy + Debug>(
        self,
        index: Vec<J>,
    ) -> Result<TimeSeriesTable<J>, CoreError> {
        TimeSeriesTable::new(index, self.columns)
    }

    /// Applies `f` to every column, keeping the index.
    pub fn map_columns<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&Column) -> Column,
    {
        Self {
            index: self.index.clone(),
            columns: self.columns.iter().map(|c| f(c)).collect(),
        }
    }

    /// Joins tables side by side on the union of their indexes.
    ///
    /// Cells a table has no row for are left missing. Column order follows the
    /// order of the input tables.
    pub fn outer_join<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let tables: Vec<Self> = tables.into_iter().collect();
        let index: Vec<K> = tables
            .iter()
            .flat_map(|t| t.index.iter().copied())
            .collect::<BTreeSet<K>>()
            .into_iter()
            .collect();

        let mut columns = Vec::with_capacity(tables.iter().map(Self::width).sum());
        for table in tables {
            // Each table's index is a sorted subset of the union, so a single
            // forward scan places every row.
            let mut positions = Vec::with_capacity(table.index.len());
            let mut cursor = 0;
            for key in &table.index {
                while index[cursor] != *key {
                    cursor += 1;
                }
                positions.push(cursor);
            }
            for column in table.columns {
                let mut values = vec![None; index.len()];
                for (row, value) in positions.iter().zip(column.values) {
                    values[*row] = value;
                }
                columns.push(Column::new(column.meta, values));
            }
        }

        Self { index, columns }
    }
}
