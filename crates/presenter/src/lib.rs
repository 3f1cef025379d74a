//! Turns transformed tables into chart specifications and draws them.
//!
//! Preparation (`prepare`) only lays data out: which lines share a panel, what the
//! x axis is, how values are formatted. Drawing is behind `ChartRenderer`, so a
//! plotting backend can be added without touching the transforms.

pub mod chart;
pub mod error;
pub mod prepare;
pub mod render;

pub use chart::{ChartSpec, Line, LineStyle, Panel, Point, ValueFormat, XValue};
pub use error::PresenterError;
pub use prepare::{
    DateRange, annualized_change_chart, indexed_performance_chart, table_chart,
    two_range_comparison,
};
pub use render::{ChartRenderer, JsonRenderer, TerminalRenderer};
