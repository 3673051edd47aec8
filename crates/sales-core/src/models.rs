use serde::Serialize;
use std::fmt;

/// A column of the fixed sales schema, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Name,
    Platform,
    YearOfRelease,
    Genre,
    NaSales,
    EuSales,
    JpSales,
    OtherSales,
    CriticScore,
    UserScore,
    Rating,
}

impl Column {
    /// Every schema column, in the order they are written out.
    pub const ALL: [Column; 11] = [
        Column::Name,
        Column::Platform,
        Column::YearOfRelease,
        Column::Genre,
        Column::NaSales,
        Column::EuSales,
        Column::JpSales,
        Column::OtherSales,
        Column::CriticScore,
        Column::UserScore,
        Column::Rating,
    ];

    /// Normalized (lower-case) column name.
    pub fn name(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Platform => "platform",
            Column::YearOfRelease => "year_of_release",
            Column::Genre => "genre",
            Column::NaSales => "na_sales",
            Column::EuSales => "eu_sales",
            Column::JpSales => "jp_sales",
            Column::OtherSales => "other_sales",
            Column::CriticScore => "critic_score",
            Column::UserScore => "user_score",
            Column::Rating => "rating",
        }
    }

    /// Resolve a header cell to a column, ignoring case and surrounding
    /// whitespace.
    pub fn from_header(header: &str) -> Option<Column> {
        let wanted = header.trim();
        Column::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sales region of the four regional sales columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    NorthAmerica,
    Europe,
    Japan,
    Other,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::NorthAmerica,
        Region::Europe,
        Region::Japan,
        Region::Other,
    ];

    /// The schema column holding this region's sales.
    pub fn column(self) -> Column {
        match self {
            Region::NorthAmerica => Column::NaSales,
            Region::Europe => Column::EuSales,
            Region::Japan => Column::JpSales,
            Region::Other => Column::OtherSales,
        }
    }

    /// Short label used in table headers.
    pub fn label(self) -> &'static str {
        match self {
            Region::NorthAmerica => "NA",
            Region::Europe => "EU",
            Region::Japan => "JP",
            Region::Other => "Other",
        }
    }
}

/// One row as read from the input file: an optional string per schema
/// column. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub name: Option<String>,
    pub platform: Option<String>,
    pub year_of_release: Option<String>,
    pub genre: Option<String>,
    pub na_sales: Option<String>,
    pub eu_sales: Option<String>,
    pub jp_sales: Option<String>,
    pub other_sales: Option<String>,
    pub critic_score: Option<String>,
    pub user_score: Option<String>,
    pub rating: Option<String>,
}

impl RawRecord {
    /// The cell for `column`, if present.
    pub fn get(&self, column: Column) -> Option<&str> {
        self.slot(column).as_deref()
    }

    /// Set the cell for `column`; empty or whitespace-only values become `None`.
    pub fn set(&mut self, column: Column, value: Option<&str>) {
        *self.slot_mut(column) = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
    }

    fn slot(&self, column: Column) -> &Option<String> {
        match column {
            Column::Name => &self.name,
            Column::Platform => &self.platform,
            Column::YearOfRelease => &self.year_of_release,
            Column::Genre => &self.genre,
            Column::NaSales => &self.na_sales,
            Column::EuSales => &self.eu_sales,
            Column::JpSales => &self.jp_sales,
            Column::OtherSales => &self.other_sales,
            Column::CriticScore => &self.critic_score,
            Column::UserScore => &self.user_score,
            Column::Rating => &self.rating,
        }
    }

    fn slot_mut(&mut self, column: Column) -> &mut Option<String> {
        match column {
            Column::Name => &mut self.name,
            Column::Platform => &mut self.platform,
            Column::YearOfRelease => &mut self.year_of_release,
            Column::Genre => &mut self.genre,
            Column::NaSales => &mut self.na_sales,
            Column::EuSales => &mut self.eu_sales,
            Column::JpSales => &mut self.jp_sales,
            Column::OtherSales => &mut self.other_sales,
            Column::CriticScore => &mut self.critic_score,
            Column::UserScore => &mut self.user_score,
            Column::Rating => &mut self.rating,
        }
    }
}

/// The table produced by the loader, before any cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Header cells exactly as they appeared in the file.
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A single cleaned game sales record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    /// Game title.
    pub name: Option<String>,
    /// Platform code, e.g. `"PS4"`.
    pub platform: String,
    /// Release year; `0` means unknown.
    pub year_of_release: u16,
    pub genre: Option<String>,
    /// North American sales in millions of units.
    pub na_sales: f64,
    /// European sales in millions of units.
    pub eu_sales: f64,
    /// Japanese sales in millions of units.
    pub jp_sales: f64,
    /// Sales in all other regions, millions of units.
    pub other_sales: f64,
    /// Critic score 0-100; `0` means unknown.
    pub critic_score: u8,
    /// User score 0-10.
    pub user_score: Option<f64>,
    /// ESRB rating code.
    pub rating: Option<String>,
}

impl SalesRecord {
    /// Sum of the four regional sales columns.
    pub fn total_sales(&self) -> f64 {
        self.na_sales + self.eu_sales + self.jp_sales + self.other_sales
    }

    /// Sales for a single region.
    pub fn regional_sales(&self, region: Region) -> f64 {
        match region {
            Region::NorthAmerica => self.na_sales,
            Region::Europe => self.eu_sales,
            Region::Japan => self.jp_sales,
            Region::Other => self.other_sales,
        }
    }

    /// `true` when the release year is known.
    pub fn has_known_year(&self) -> bool {
        self.year_of_release != 0
    }
}

/// The cleaned, typed table. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    columns: Vec<String>,
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(columns: Vec<String>, records: Vec<SalesRecord>) -> Self {
        Self { columns, records }
    }

    /// Normalized column names, in the order of the source header.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow the records matching `predicate`.
    pub fn filter<P>(&self, predicate: P) -> Vec<&SalesRecord>
    where
        P: Fn(&SalesRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }
}

impl<'a> IntoIterator for &'a SalesTable {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(platform: &str, year: u16, sales: [f64; 4]) -> SalesRecord {
        SalesRecord {
            name: Some("Game".to_string()),
            platform: platform.to_string(),
            year_of_release: year,
            genre: Some("Action".to_string()),
            na_sales: sales[0],
            eu_sales: sales[1],
            jp_sales: sales[2],
            other_sales: sales[3],
            critic_score: 0,
            user_score: None,
            rating: None,
        }
    }

    #[test]
    fn test_column_from_header_ignores_case_and_whitespace() {
        assert_eq!(Column::from_header("Year_of_Release"), Some(Column::YearOfRelease));
        assert_eq!(Column::from_header("  NA_sales "), Some(Column::NaSales));
        assert_eq!(Column::from_header("publisher"), None);
    }

    #[test]
    fn test_column_names_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_header(column.name()), Some(column));
        }
    }

    #[test]
    fn test_raw_record_set_treats_blank_as_missing() {
        let mut raw = RawRecord::default();
        raw.set(Column::Genre, Some("   "));
        assert_eq!(raw.get(Column::Genre), None);
        raw.set(Column::Genre, Some(" Sports "));
        assert_eq!(raw.get(Column::Genre), Some("Sports"));
    }

    #[test]
    fn test_total_sales_sums_regions() {
        let r = record("PS4", 2015, [1.5, 2.25, 0.25, 0.5]);
        assert!((r.total_sales() - 4.5).abs() < 1e-9);
        let by_region: f64 = Region::ALL.iter().map(|&reg| r.regional_sales(reg)).sum();
        assert!((by_region - r.total_sales()).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_year() {
        assert!(!record("PS4", 0, [0.0; 4]).has_known_year());
        assert!(record("PS4", 2016, [0.0; 4]).has_known_year());
    }

    #[test]
    fn test_table_filter_borrows_matching_records() {
        let table = SalesTable::new(
            vec!["platform".to_string()],
            vec![
                record("PS4", 2015, [1.0, 0.0, 0.0, 0.0]),
                record("XOne", 2015, [1.0, 0.0, 0.0, 0.0]),
                record("PS4", 2010, [1.0, 0.0, 0.0, 0.0]),
            ],
        );
        let ps4 = table.filter(|r| r.platform == "PS4");
        assert_eq!(ps4.len(), 2);
        assert_eq!(table.len(), 3);
    }
}
