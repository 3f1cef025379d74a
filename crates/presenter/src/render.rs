use crate::chart::{ChartSpec, Panel, ValueFormat, XValue};
use crate::error::PresenterError;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// A drawing backend for prepared charts.
pub trait ChartRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<String, PresenterError>;
}

/// Prints each panel as a table: one row per x position, one column per line.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    /// Render at most this many trailing rows per panel; `None` prints everything.
    pub max_rows: Option<usize>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rows(max_rows: usize) -> Self {
        Self {
            max_rows: Some(max_rows),
        }
    }

    fn panel_table(&self, panel: &Panel, x_label: &str) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let mut header = vec![Cell::new(x_label)];
        header.extend(panel.lines.iter().map(|l| Cell::new(&l.label)));
        table.set_header(header);

        let xs: BTreeSet<XValue> = panel
            .lines
            .iter()
            .flat_map(|l| l.points.iter().map(|p| p.x))
            .collect();
        let lookups: Vec<BTreeMap<XValue, Option<Decimal>>> = panel
            .lines
            .iter()
            .map(|l| l.points.iter().map(|p| (p.x, p.y)).collect())
            .collect();

        let skip = self
            .max_rows
            .map_or(0, |max| xs.len().saturating_sub(max));
        for x in xs.into_iter().skip(skip) {
            let mut row = vec![Cell::new(x.to_string())];
            row.extend(lookups.iter().map(|lookup| {
                let value = lookup.get(&x).copied().flatten();
                Cell::new(format_value(value, panel.format)).set_alignment(CellAlignment::Right)
            }));
            table.add_row(row);
        }
        table
    }
}

impl ChartRenderer for TerminalRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<String, PresenterError> {
        if chart.panels.is_empty() {
            return Err(PresenterError::EmptyChart(chart.title.clone()));
        }
        let mut out = String::new();
        for panel in &chart.panels {
            out.push_str(&format!("== {} ==\n", panel.title));
            out.push_str(&self.panel_table(panel, &chart.x_label).to_string());
            out.push('\n');
        }
        Ok(out)
    }
}

/// Serializes the chart specification for an external plotting tool.
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl ChartRenderer for JsonRenderer {
    fn render(&self, chart: &ChartSpec) -> Result<String, PresenterError> {
        Ok(serde_json::to_string_pretty(chart)?)
    }
}

/// Missing cells print as blanks.
pub fn format_value(value: Option<Decimal>, format: ValueFormat) -> String {
    match (value, format) {
        (None, _) => String::new(),
        (Some(v), ValueFormat::Number) => v.round_dp(2).to_string(),
        (Some(v), ValueFormat::Percent) => {
            format!("{}%", (v * Decimal::ONE_HUNDRED).round_dp(1))
        }
    }
}
