pub mod enums;
pub mod error;
pub mod structs;
pub mod table;

// Re-export the core types to provide a clean public API.
pub use enums::{AggregationMethod, Frequency};
pub use error::CoreError;
pub use structs::{Column, ColumnMeta, Indicator, Lookback, Observation};
pub use table::{DateTable, OffsetTable, TimeSeriesTable};
