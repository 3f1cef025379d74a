use crate::chart::{ChartSpec, Line, LineStyle, Panel, Point, ValueFormat, XValue};
use analytics::TimeSeriesTransformer;
use chrono::NaiveDate;
use core_types::{Column, DateTable, Frequency, Indicator, OffsetTable, TimeSeriesTable};
use std::fmt;
use std::fmt::Debug;

/// An inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// A single panel with one solid line per column.
pub fn table_chart<K>(table: &TimeSeriesTable<K>, title: &str, x_label: &str) -> ChartSpec
where
    K: Ord + Copy + Debug + Into<XValue>,
{
    let lines = table
        .columns()
        .iter()
        .map(|column| line(table.index(), column, column.label(), LineStyle::Solid))
        .collect();

    ChartSpec {
        title: title.to_string(),
        x_label: x_label.to_string(),
        panels: vec![Panel {
            title: title.to_string(),
            format: ValueFormat::Number,
            lines,
        }],
    }
}

/// One panel per source indicator, one percentage line per lookback period.
pub fn annualized_change_chart(table: &DateTable) -> ChartSpec {
    let mut panels: Vec<(Indicator, Panel)> = Vec::new();
    for column in table.columns() {
        let line = line(table.index(), column, column.label(), LineStyle::Solid);
        match panels.iter_mut().find(|(indicator, _)| *indicator == column.meta.indicator) {
            Some((_, panel)) => panel.lines.push(line),
            None => panels.push((
                column.meta.indicator.clone(),
                Panel {
                    title: column.meta.indicator.name.clone(),
                    format: ValueFormat::Percent,
                    lines: vec![line],
                },
            )),
        }
    }

    ChartSpec {
        title: "Annualized % change".to_string(),
        x_label: "date".to_string(),
        panels: panels.into_iter().map(|(_, panel)| panel).collect(),
    }
}

/// Indexed performance trajectories, keyed by offset from the anchor.
pub fn indexed_performance_chart(table: &OffsetTable, title: &str) -> ChartSpec {
    table_chart(table, title, "periods from anchor")
}

/// Overlays two periods of every column on a shared axis.
///
/// The second range is re-dated onto consecutive periods starting at the first
/// range's first date, so both lines start at the same x position. With
/// `index_to_100`, each range is rebased to 100 at its own first row.
pub fn two_range_comparison(
    table: &DateTable,
    first: DateRange,
    second: DateRange,
    index_to_100: bool,
    frequency: Frequency,
) -> ChartSpec {
    let transformer = TimeSeriesTransformer::new();
    let mut left = transformer.filter_by_date(table, first.start, first.end);
    let mut right = transformer.filter_by_date(table, second.start, second.end);
    if index_to_100 {
        left = transformer.index_to_first(&left);
        right = transformer.index_to_first(&right);
    }

    let origin = left.first_key().or(right.first_key());
    let mapped = origin.map_or_else(Vec::new, |start| mapped_index(start, right.len(), frequency));
    tracing::debug!(
        first = %first,
        second = %second,
        first_rows = left.len(),
        second_rows = right.len(),
        "Prepared two-range comparison"
    );

    let panels = left
        .columns()
        .iter()
        .zip(right.columns())
        .map(|(l, r)| {
            let label = l.label();
            Panel {
                title: label.clone(),
                format: ValueFormat::Number,
                lines: vec![
                    line(left.index(), l, format!("{}: {}", label, first), LineStyle::Solid),
                    line(&mapped, r, format!("{}: {}", label, second), LineStyle::Dashed),
                ],
            }
        })
        .collect();

    ChartSpec {
        title: format!("{} vs {}", first, second),
        x_label: "date".to_string(),
        panels,
    }
}

/// `len` consecutive period-end dates starting with the period containing `start`.
pub fn mapped_index(start: NaiveDate, len: usize, frequency: Frequency) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(len);
    let mut current = Some(frequency.period_end(start));
    while dates.len() < len {
        let Some(date) = current else { break };
        dates.push(date);
        current = frequency.next_period_end(date);
    }
    dates
}

fn line<K>(index: &[K], column: &Column, label: String, style: LineStyle) -> Line
where
    K: Copy + Into<XValue>,
{
    Line {
        label,
        style,
        points: index
            .iter()
            .zip(&column.values)
            .map(|(x, y)| Point {
                x: (*x).into(),
                y: *y,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{ColumnMeta, Lookback};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_table(start: NaiveDate, names: &[&str], len: usize) -> DateTable {
        let index = mapped_index(start, len, Frequency::Monthly);
        let columns = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values = (0..len)
                    .map(|row| Some(rust_decimal::Decimal::from((i + 1) * 10 + row)))
                    .collect();
                Column::new(ColumnMeta::for_indicator(Indicator::new(*name, *name)), values)
            })
            .collect();
        DateTable::new(index, columns).unwrap()
    }

    #[test]
    fn mapped_index_steps_by_period_end() {
        assert_eq!(
            mapped_index(date(2023, 1, 31), 3, Frequency::Monthly),
            vec![date(2023, 1, 31), date(2023, 2, 28), date(2023, 3, 31)]
        );
        assert!(mapped_index(date(2023, 1, 31), 0, Frequency::Monthly).is_empty());
    }

    #[test]
    fn annualized_chart_groups_periods_by_indicator() {
        let cpi = Indicator::new("CPIAUCSL", "CPI");
        let core = Indicator::new("CPILFESL", "Core CPI");
        let index = vec![date(2023, 1, 31)];
        let column = |indicator: &Indicator, periods| {
            let meta = ColumnMeta::for_indicator(indicator.clone()).with_lookback(Lookback {
                periods,
                frequency: Frequency::Monthly,
            });
            Column::new(meta, vec![Some(dec!(0.01))])
        };
        let table = DateTable::new(
            index,
            vec![column(&cpi, 1), column(&core, 1), column(&cpi, 12), column(&core, 12)],
        )
        .unwrap();

        let chart = annualized_change_chart(&table);
        assert_eq!(chart.panels.len(), 2);
        assert_eq!(chart.panels[0].title, "CPI");
        assert_eq!(chart.panels[0].format, ValueFormat::Percent);
        let labels: Vec<_> = chart.panels[0].lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["CPI 1m ann % chg", "CPI 12m ann % chg"]);
        assert_eq!(chart.panels[1].lines.len(), 2);
    }

    #[test]
    fn two_range_comparison_maps_second_range_onto_first() {
        let table = monthly_table(date(2000, 1, 31), &["CPI"], 36);
        let chart = two_range_comparison(
            &table,
            DateRange::new(date(2000, 1, 1), date(2000, 3, 31)),
            DateRange::new(date(2002, 1, 1), date(2002, 4, 30)),
            true,
            Frequency::Monthly,
        );

        assert_eq!(chart.panels.len(), 1);
        let [first, second] = &chart.panels[0].lines[..] else {
            panic!("expected two lines");
        };
        assert_eq!(first.style, LineStyle::Solid);
        assert_eq!(second.style, LineStyle::Dashed);
        assert_eq!(first.points.len(), 3);
        assert_eq!(second.points.len(), 4);
        assert_eq!(second.points[0].x, XValue::Date(date(2000, 1, 31)));
        assert_eq!(second.points[3].x, XValue::Date(date(2000, 4, 30)));
        assert_eq!(first.points[0].y, Some(dec!(100)));
        assert_eq!(second.points[0].y, Some(dec!(100)));
        assert!(first.label.starts_with("CPI: 2000-01-01 to 2000-03-31"));
    }

    #[test]
    fn offset_chart_uses_offsets_on_x_axis() {
        let meta = ColumnMeta::for_indicator(Indicator::new("a", "a"));
        let table = OffsetTable::new(vec![-1, 0, 1], vec![Column::new(meta, vec![None, Some(dec!(100)), None])]).unwrap();
        let chart = indexed_performance_chart(&table, "Indexed");
        let points = &chart.panels[0].lines[0].points;
        assert_eq!(points[0].x, XValue::Offset(-1));
        assert_eq!(points[1].y, Some(dec!(100)));
        assert_eq!(chart.x_label, "periods from anchor");
    }
}
