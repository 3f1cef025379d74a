use crate::enums::Frequency;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single named macroeconomic series, e.g. `CPIAUCSL` displayed as `CPI`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Indicator {
    /// The provider-specific series code.
    pub key: String,
    /// The human-readable name used as the column label.
    pub name: String,
}

impl Indicator {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// One raw observation as returned by a series provider.
///
/// `value` is `None` when the provider marks the observation as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<Decimal>,
}

/// The lookback a column of annualized changes was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lookback {
    pub periods: u32,
    pub frequency: Frequency,
}

/// The structured identity of a table column.
///
/// Transforms tag columns here instead of encoding their derivation into the label,
/// so grouping never has to parse a display string back apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub indicator: Indicator,
    pub lookback: Option<Lookback>,
    pub anchor: Option<NaiveDate>,
}

impl ColumnMeta {
    pub fn for_indicator(indicator: Indicator) -> Self {
        Self {
            indicator,
            lookback: None,
            anchor: None,
        }
    }

    pub fn with_lookback(mut self, lookback: Lookback) -> Self {
        self.lookback = Some(lookback);
        self
    }

    pub fn with_anchor(mut self, anchor: NaiveDate) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// The same column identity with the anchor tag removed.
    pub fn without_anchor(&self) -> Self {
        Self {
            anchor: None,
            ..self.clone()
        }
    }

    /// The display label, e.g. `CPI 12m ann % chg` or `CPI_2008-01-31`.
    pub fn label(&self) -> String {
        let mut label = self.indicator.name.clone();
        if let Some(lookback) = &self.lookback {
            label.push_str(&format!(
                " {}{} ann % chg",
                lookback.periods,
                lookback.frequency.code()
            ));
        }
        if let Some(anchor) = &self.anchor {
            label.push_str(&format!("_{}", anchor.format("%Y-%m-%d")));
        }
        label
    }
}

/// A column of optional values aligned to a table's index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub meta: ColumnMeta,
    pub values: Vec<Option<Decimal>>,
}

impl Column {
    pub fn new(meta: ColumnMeta, values: Vec<Option<Decimal>>) -> Self {
        Self { meta, values }
    }

    pub fn label(&self) -> String {
        self.meta.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_reflects_derivation_tags() {
        let anchor = NaiveDate::from_ymd_opt(2008, 1, 31).unwrap();
        let meta = ColumnMeta::for_indicator(Indicator::new("CPIAUCSL", "CPI"));
        assert_eq!(meta.label(), "CPI");

        let annualized = meta.clone().with_lookback(Lookback {
            periods: 12,
            frequency: Frequency::Monthly,
        });
        assert_eq!(annualized.label(), "CPI 12m ann % chg");

        let anchored = meta.clone().with_anchor(anchor);
        assert_eq!(anchored.label(), "CPI_2008-01-31");
        assert_eq!(anchored.without_anchor(), meta);
    }

    #[test]
    fn names_with_underscores_survive_anchor_removal() {
        let anchor = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        let meta = ColumnMeta::for_indicator(Indicator::new("X", "Core_CPI")).with_anchor(anchor);
        assert_eq!(meta.label(), "Core_CPI_2020-02-29");
        assert_eq!(meta.without_anchor().label(), "Core_CPI");
    }
}
