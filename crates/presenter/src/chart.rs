use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// A position on a chart's horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Date(NaiveDate),
    Offset(i64),
}

impl From<NaiveDate> for XValue {
    fn from(value: NaiveDate) -> Self {
        XValue::Date(value)
    }
}

impl From<i64> for XValue {
    fn from(value: i64) -> Self {
        XValue::Offset(value)
    }
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            XValue::Offset(offset) => write!(f, "{}", offset),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// How a renderer should print a panel's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    Number,
    /// Values are fractions, shown as percentages (0.12 -> 12.0%).
    Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: XValue,
    pub y: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub label: String,
    pub style: LineStyle,
    pub points: Vec<Point>,
}

/// One set of axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub format: ValueFormat,
    pub lines: Vec<Line>,
}

/// Everything a drawing backend needs to plot a figure of line charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub panels: Vec<Panel>,
}
