use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unsupported frequency '{0}'. Supported frequencies are: d, w, m, q, y (or a)")]
    UnsupportedFrequency(String),

    #[error("Unsupported aggregation method '{0}'. Supported methods are: avg, sum, eop")]
    UnsupportedAggregation(String),

    #[error("Invalid table index: {0}")]
    InvalidIndex(String),

    #[error("Column '{label}' has {actual} values but the index has {expected} rows")]
    ColumnLength {
        label: String,
        expected: usize,
        actual: usize,
    },
}
