//! Cleaning rules that turn a [`RawTable`] into a typed [`SalesTable`].
//!
//! The steps run in a fixed order: column names are lower-cased, a missing
//! `year_of_release` becomes `0`, a missing `critic_score` becomes `0`, and
//! the `"tbd"` sentinel in `user_score` becomes null before the remaining
//! scores are parsed as decimals. No row is dropped.

use serde::Serialize;
use tracing::{debug, warn};

use sales_core::error::{Result, SalesError};
use sales_core::models::{Column, RawRecord, RawTable, SalesRecord, SalesTable};

/// Literal `user_score` value meaning "score not yet determined".
pub const USER_SCORE_SENTINEL: &str = "tbd";

/// Columns whose nulls are tolerated and only reported.
pub const NON_CRITICAL_COLUMNS: [Column; 3] = [Column::Name, Column::Genre, Column::Rating];

// ── Column rules ──────────────────────────────────────────────────────────────

/// Lower-case every header name.
pub fn normalize_column_names(columns: &[String]) -> Vec<String> {
    columns.iter().map(|c| c.trim().to_lowercase()).collect()
}

/// Missing years become `0` (unknown); present values must be whole,
/// non-negative numbers. `"2006.0"` is accepted.
pub fn parse_year_of_release(value: Option<&str>) -> std::result::Result<u16, String> {
    match value {
        None => Ok(0),
        Some(v) => parse_whole_number(v, u16::MAX as f64).map(|n| n as u16),
    }
}

/// Missing critic scores become `0`; present values must be whole numbers
/// in `0..=100`.
pub fn parse_critic_score(value: Option<&str>) -> std::result::Result<u8, String> {
    match value {
        None => Ok(0),
        Some(v) => parse_whole_number(v, 100.0).map(|n| n as u8),
    }
}

/// Map the [`USER_SCORE_SENTINEL`] and missing cells to `None`, parse the
/// rest as a decimal in `0..=10`.
pub fn parse_user_score(value: Option<&str>) -> std::result::Result<Option<f64>, String> {
    let Some(v) = value.filter(|v| *v != USER_SCORE_SENTINEL) else {
        return Ok(None);
    };
    let score = parse_decimal(v)?;
    if !(0.0..=10.0).contains(&score) {
        return Err("user score must be between 0 and 10".to_string());
    }
    Ok(Some(score))
}

/// Parse a regional sales figure. Missing cells count as `0.0`.
pub fn parse_sales(value: Option<&str>) -> std::result::Result<f64, String> {
    let Some(v) = value else {
        return Ok(0.0);
    };
    let sales = parse_decimal(v)?;
    if sales < 0.0 {
        return Err("sales cannot be negative".to_string());
    }
    Ok(sales)
}

fn parse_decimal(value: &str) -> std::result::Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err("not a number".to_string()),
    }
}

fn parse_whole_number(value: &str, max: f64) -> std::result::Result<u32, String> {
    let n = parse_decimal(value)?;
    if n.fract() != 0.0 {
        return Err("not a whole number".to_string());
    }
    if n < 0.0 || n > max {
        return Err(format!("must be between 0 and {max}"));
    }
    Ok(n as u32)
}

// ── Table cleaning ────────────────────────────────────────────────────────────

const SALES_COLUMNS: [Column; 4] = [
    Column::NaSales,
    Column::EuSales,
    Column::JpSales,
    Column::OtherSales,
];

/// Number of empty regional sales cells in `raw`. Cleaning reads each one
/// as `0.0`.
pub fn empty_sales_cells(raw: &RawTable) -> usize {
    raw.records
        .iter()
        .map(|row| SALES_COLUMNS.iter().filter(|&&c| row.get(c).is_none()).count())
        .sum()
}

/// Apply every cleaning rule to `raw`, consuming it.
///
/// The first cell that violates its column type aborts cleaning with
/// [`SalesError::InvalidField`]; rows are numbered from 1.
pub fn clean_table(raw: RawTable) -> Result<SalesTable> {
    let columns = normalize_column_names(&raw.columns);

    let empty = empty_sales_cells(&raw);
    if empty > 0 {
        warn!("{} empty regional sales cells were counted as 0", empty);
    }

    let records = raw
        .records
        .iter()
        .enumerate()
        .map(|(i, row)| clean_record(i + 1, row))
        .collect::<Result<Vec<_>>>()?;
    debug!("Cleaned {} records", records.len());

    Ok(SalesTable::new(columns, records))
}

/// Convert one raw row into a [`SalesRecord`].
pub fn clean_record(row: usize, raw: &RawRecord) -> Result<SalesRecord> {
    let field = |column: Column, reason: String| {
        SalesError::invalid_field(row, column.name(), raw.get(column).unwrap_or(""), reason)
    };

    let platform = raw
        .get(Column::Platform)
        .map(str::to_string)
        .ok_or_else(|| field(Column::Platform, "platform is required".to_string()))?;

    let sales = |column: Column| parse_sales(raw.get(column)).map_err(|r| field(column, r));

    Ok(SalesRecord {
        name: raw.get(Column::Name).map(str::to_string),
        platform,
        year_of_release: parse_year_of_release(raw.get(Column::YearOfRelease))
            .map_err(|r| field(Column::YearOfRelease, r))?,
        genre: raw.get(Column::Genre).map(str::to_string),
        na_sales: sales(Column::NaSales)?,
        eu_sales: sales(Column::EuSales)?,
        jp_sales: sales(Column::JpSales)?,
        other_sales: sales(Column::OtherSales)?,
        critic_score: parse_critic_score(raw.get(Column::CriticScore))
            .map_err(|r| field(Column::CriticScore, r))?,
        user_score: parse_user_score(raw.get(Column::UserScore))
            .map_err(|r| field(Column::UserScore, r))?,
        rating: raw.get(Column::Rating).map(str::to_string),
    })
}

// ── Missing-value summary ─────────────────────────────────────────────────────

/// Per-column count of missing cells in a raw table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingValueSummary {
    pub total_rows: usize,
    /// Null-cell count for every schema column, in schema order.
    pub missing: Vec<(Column, usize)>,
    /// `user_score` cells holding the [`USER_SCORE_SENTINEL`].
    pub user_score_sentinels: usize,
}

impl MissingValueSummary {
    pub fn from_raw(table: &RawTable) -> Self {
        let missing = Column::ALL
            .into_iter()
            .map(|column| {
                let count = table
                    .records
                    .iter()
                    .filter(|r| r.get(column).is_none())
                    .count();
                (column, count)
            })
            .collect();

        let user_score_sentinels = table
            .records
            .iter()
            .filter(|r| r.get(Column::UserScore) == Some(USER_SCORE_SENTINEL))
            .count();

        Self {
            total_rows: table.len(),
            missing,
            user_score_sentinels,
        }
    }

    /// Missing-cell count for `column`.
    pub fn get(&self, column: Column) -> usize {
        self.missing
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn has_missing(&self) -> bool {
        self.missing.iter().any(|(_, n)| *n > 0)
    }

    /// Log a data-quality warning for every non-critical column with nulls.
    /// Returns the columns that were reported.
    pub fn warn_data_quality(&self) -> Vec<Column> {
        NON_CRITICAL_COLUMNS
            .into_iter()
            .filter(|&column| {
                let count = self.get(column);
                if count > 0 {
                    warn!(
                        "Data quality: {} rows have no {}; they are kept",
                        count,
                        column.name()
                    );
                }
                count > 0
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw_row(cells: [Option<&str>; 11]) -> RawRecord {
        let mut raw = RawRecord::default();
        for (column, value) in Column::ALL.into_iter().zip(cells) {
            raw.set(column, value);
        }
        raw
    }

    fn complete_row() -> RawRecord {
        raw_row([
            Some("Wii Sports"),
            Some("Wii"),
            Some("2006.0"),
            Some("Sports"),
            Some("41.36"),
            Some("28.96"),
            Some("3.77"),
            Some("8.45"),
            Some("76.0"),
            Some("8"),
            Some("E"),
        ])
    }

    fn table_of(rows: Vec<RawRecord>) -> RawTable {
        RawTable {
            columns: Column::ALL
                .iter()
                .map(|c| c.name().to_uppercase())
                .collect(),
            records: rows,
        }
    }

    // ── rules ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_column_names_lowercases() {
        let cols = vec!["Name".to_string(), "NA_sales".to_string(), " Rating ".to_string()];
        assert_eq!(normalize_column_names(&cols), vec!["name", "na_sales", "rating"]);
    }

    #[test]
    fn test_year_fill_and_cast() {
        assert_eq!(parse_year_of_release(None), Ok(0));
        assert_eq!(parse_year_of_release(Some("2006.0")), Ok(2006));
        assert_eq!(parse_year_of_release(Some("1985")), Ok(1985));
        assert!(parse_year_of_release(Some("2006.5")).is_err());
        assert!(parse_year_of_release(Some("-1")).is_err());
        assert!(parse_year_of_release(Some("soon")).is_err());
    }

    #[test]
    fn test_critic_score_fill_and_range() {
        assert_eq!(parse_critic_score(None), Ok(0));
        assert_eq!(parse_critic_score(Some("76.0")), Ok(76));
        assert_eq!(parse_critic_score(Some("100")), Ok(100));
        assert!(parse_critic_score(Some("101")).is_err());
    }

    #[test]
    fn test_user_score_sentinel_maps_to_null() {
        let cleaned: Vec<Option<f64>> = [Some("8.5"), Some("tbd"), None]
            .into_iter()
            .map(|v| parse_user_score(v).expect("valid"))
            .collect();
        assert_eq!(cleaned, vec![Some(8.5), None, None]);
    }

    #[test]
    fn test_user_score_range_checked() {
        assert_eq!(parse_user_score(Some("0")), Ok(Some(0.0)));
        assert_eq!(parse_user_score(Some("10")), Ok(Some(10.0)));
        assert!(parse_user_score(Some("10.1")).is_err());
        assert!(parse_user_score(Some("TBA")).is_err());
    }

    #[test]
    fn test_sales_rules() {
        assert_eq!(parse_sales(None), Ok(0.0));
        assert_eq!(parse_sales(Some("0.01")), Ok(0.01));
        assert!(parse_sales(Some("-0.5")).is_err());
        assert!(parse_sales(Some("NaN")).is_err());
    }

    // ── clean_table ───────────────────────────────────────────────────────────

    #[test]
    fn test_clean_table_types_every_field() {
        let table = clean_table(table_of(vec![complete_row()])).expect("clean");
        let r = &table.records()[0];
        assert_eq!(r.name.as_deref(), Some("Wii Sports"));
        assert_eq!(r.platform, "Wii");
        assert_eq!(r.year_of_release, 2006);
        assert_eq!(r.critic_score, 76);
        assert_eq!(r.user_score, Some(8.0));
        assert!((r.total_sales() - 82.54).abs() < 1e-9);
        assert_eq!(table.columns()[0], "name");
    }

    #[test]
    fn test_clean_table_keeps_rows_with_null_name_and_genre() {
        let row = raw_row([
            None,
            Some("GEN"),
            Some("1993"),
            None,
            Some("1.78"),
            Some("0.53"),
            Some("0"),
            Some("0.08"),
            None,
            None,
            None,
        ]);
        let table = clean_table(table_of(vec![row])).expect("clean");
        assert_eq!(table.len(), 1);
        let r = &table.records()[0];
        assert_eq!(r.name, None);
        assert_eq!(r.genre, None);
        assert_eq!(r.critic_score, 0);
        assert_eq!(r.user_score, None);
    }

    #[test]
    fn test_clean_table_missing_year_becomes_zero() {
        let mut row = complete_row();
        row.set(Column::YearOfRelease, None);
        let table = clean_table(table_of(vec![row])).expect("clean");
        assert_eq!(table.records()[0].year_of_release, 0);
    }

    #[test]
    fn test_clean_table_reports_row_and_column() {
        let mut bad = complete_row();
        bad.set(Column::EuSales, Some("lots"));
        let err = clean_table(table_of(vec![complete_row(), bad])).unwrap_err();
        match err {
            SalesError::InvalidField {
                row, column, value, ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(column, "eu_sales");
                assert_eq!(value, "lots");
            }
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_clean_table_counts_empty_sales_cell_as_zero() {
        let mut row = complete_row();
        row.set(Column::EuSales, None);
        let raw = table_of(vec![complete_row(), row]);
        assert_eq!(empty_sales_cells(&raw), 1);

        let table = clean_table(raw).expect("clean");
        assert_eq!(table.len(), 2);
        let r = &table.records()[1];
        assert_eq!(r.eu_sales, 0.0);
        assert!((r.total_sales() - (41.36 + 3.77 + 8.45)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_sales_cells_counts_every_region() {
        let mut row = complete_row();
        for column in SALES_COLUMNS {
            row.set(column, None);
        }
        let raw = table_of(vec![row, complete_row()]);
        assert_eq!(empty_sales_cells(&raw), 4);
        assert_eq!(clean_table(raw).expect("clean").records()[0].total_sales(), 0.0);
    }

    #[test]
    fn test_clean_table_requires_platform() {
        let mut row = complete_row();
        row.set(Column::Platform, None);
        let err = clean_table(table_of(vec![row])).unwrap_err();
        assert!(err.to_string().contains("platform is required"));
    }

    // ── MissingValueSummary ───────────────────────────────────────────────────

    #[test]
    fn test_missing_value_summary_counts() {
        let mut no_genre = complete_row();
        no_genre.set(Column::Genre, None);
        no_genre.set(Column::UserScore, Some("tbd"));
        let mut no_name = complete_row();
        no_name.set(Column::Name, None);
        no_name.set(Column::UserScore, None);

        let summary = MissingValueSummary::from_raw(&table_of(vec![
            complete_row(),
            no_genre,
            no_name,
        ]));

        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.get(Column::Genre), 1);
        assert_eq!(summary.get(Column::Name), 1);
        assert_eq!(summary.get(Column::UserScore), 1);
        assert_eq!(summary.get(Column::Platform), 0);
        assert_eq!(summary.user_score_sentinels, 1);
        assert!(summary.has_missing());
        assert_eq!(summary.warn_data_quality(), vec![Column::Name, Column::Genre]);
    }

    #[test]
    fn test_missing_value_summary_clean_table() {
        let summary = MissingValueSummary::from_raw(&table_of(vec![complete_row()]));
        assert!(!summary.has_missing());
        assert!(summary.warn_data_quality().is_empty());
    }

    proptest! {
        #[test]
        fn prop_cleaned_rows_keep_derivation_and_year(
            year in prop::option::of(1980u16..2017),
            sales in prop::collection::vec(prop::option::of(0.0f64..100.0), 4),
        ) {
            let year_text = year.map(|y| format!("{y}.0"));
            let sales_text: Vec<Option<String>> =
                sales.iter().map(|v| v.map(|v| format!("{v:.2}"))).collect();

            let mut row = complete_row();
            row.set(Column::YearOfRelease, year_text.as_deref());
            for (column, value) in SALES_COLUMNS
                .into_iter()
                .zip(&sales_text)
            {
                row.set(column, value.as_deref());
            }

            let record = clean_record(1, &row).expect("clean");
            let expected: f64 = sales_text
                .iter()
                .map(|v| v.as_deref().map_or(0.0, |t| t.parse::<f64>().unwrap_or(0.0)))
                .sum();

            prop_assert!((record.total_sales() - expected).abs() < 1e-9);
            prop_assert_eq!(record.year_of_release, year.unwrap_or(0));
        }
    }
}
