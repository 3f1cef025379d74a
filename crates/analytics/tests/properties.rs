use analytics::{AnalyticsError, TimeSeriesTransformer};
use chrono::NaiveDate;
use core_types::{Column, ColumnMeta, DateTable, Frequency, Indicator};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn month_end(year: i32, month: u32) -> NaiveDate {
    Frequency::Monthly.period_end(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
}

/// Twenty years of monthly CPI-like data with two indicators and a gap.
fn cpi_table() -> DateTable {
    let mut index = Vec::new();
    let mut date = month_end(1965, 1);
    for _ in 0..240 {
        index.push(date);
        date = Frequency::Monthly.next_period_end(date).unwrap();
    }
    let headline = (0..240)
        .map(|i| Some(dec!(30) + Decimal::from(i) * dec!(0.25)))
        .collect();
    let core = (0..240)
        .map(|i| (i != 100).then(|| dec!(28) + Decimal::from(i) * dec!(0.2)))
        .collect();
    DateTable::new(
        index,
        vec![
            Column::new(ColumnMeta::for_indicator(Indicator::new("CPIAUCSL", "CPI")), headline),
            Column::new(ColumnMeta::for_indicator(Indicator::new("CPILFESL", "Core CPI")), core),
        ],
    )
    .unwrap()
}

fn recession_starts() -> Vec<NaiveDate> {
    vec![
        month_end(1970, 1),
        month_end(1973, 12),
        month_end(1980, 2),
        month_end(1981, 8),
    ]
}

#[rstest]
#[case(month_end(1966, 3), month_end(1982, 12))]
#[case(month_end(1970, 1), month_end(1970, 1))]
#[case(month_end(1990, 1), month_end(1999, 1))]
#[case(month_end(1975, 6), month_end(1974, 6))]
fn filter_is_idempotent(#[case] start: NaiveDate, #[case] end: NaiveDate) {
    let transformer = TimeSeriesTransformer::new();
    let table = cpi_table();
    let once = transformer.filter_by_date(&table, start, end);
    let twice = transformer.filter_by_date(&once, start, end);
    assert_eq!(once, twice);
    assert!(once.index().iter().all(|d| *d >= start && *d <= end));
}

#[rstest]
#[case(&[12], 2)]
#[case(&[1, 3], 4)]
#[case(&[1, 3, 12], 6)]
fn annualized_width_is_linear_in_periods(#[case] periods: &[u32], #[case] width: usize) {
    let table = cpi_table();
    let result = TimeSeriesTransformer::new()
        .annualized_change(&table, Frequency::Monthly, periods)
        .unwrap();
    assert_eq!(result.width(), width);
    assert_eq!(result.len(), table.len());
}

#[test]
fn every_anchor_row_is_one_hundred() {
    let table = cpi_table();
    let result = TimeSeriesTransformer::new()
        .indexed_performance_around_dates(&table, &recession_starts(), 18)
        .unwrap();
    assert_eq!(result.width(), 2 * recession_starts().len());
    // Offsets count rows, so a clamped window start can shift the anchor off zero.
    for column in result.columns() {
        assert!(column.values.contains(&Some(dec!(100))), "{}", column.label());
    }

    let first = result.column("CPI_1970-01-31").unwrap();
    assert_eq!(first.values[result.position(0).unwrap()], Some(dec!(100)));
}

#[test]
fn windows_near_history_edges_are_clipped() {
    let table = cpi_table();
    let transformer = TimeSeriesTransformer::new();
    for anchor in [month_end(1965, 6), month_end(1984, 10)] {
        let result = transformer
            .indexed_performance_around_dates(&table, &[anchor], 18)
            .unwrap();
        assert!(result.len() < 2 * 18 + 1, "{anchor}: {} rows", result.len());
        assert_eq!(result.first_key(), Some(-18));
    }
}

#[test]
fn averaged_columns_are_the_indicator_names() {
    let table = cpi_table();
    let result = TimeSeriesTransformer::new()
        .averaged_indexed_performance(&table, &recession_starts(), 18)
        .unwrap();
    assert_eq!(result.labels(), vec!["CPI", "Core CPI"]);
    assert_eq!(result.len(), 2 * 18 + 1);
    assert_eq!(result.first_key(), Some(-18));
    assert_eq!(result.last_key(), Some(18));
}

#[test]
fn anchor_outside_the_index_is_an_error() {
    let table = cpi_table();
    let err = TimeSeriesTransformer::new()
        .averaged_indexed_performance(&table, &[NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()], 18)
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::MissingAnchorDate(_)));
}

#[test]
fn annualized_then_filtered_matches_filter_of_full_result() {
    let transformer = TimeSeriesTransformer::new();
    let table = cpi_table();
    let changes = transformer
        .annualized_change(&table, Frequency::Monthly, &[1, 3, 12])
        .unwrap();
    let window = transformer.filter_by_date(&changes, month_end(1978, 12), month_end(1983, 7));
    assert_eq!(window.len(), 56);
    assert!(window.columns()[4].values.iter().all(Option::is_some));
}
