//! Grouped counts and sales sums over cleaned records.
//!
//! Every query accepts any iterator of borrowed records, so callers decide
//! what to group: the whole table or a view filtered by year or platform.

use std::collections::BTreeMap;

use serde::Serialize;

use sales_core::models::{Region, SalesRecord};

// ── Result rows ───────────────────────────────────────────────────────────────

/// Number of titles released in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub year: u16,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformSales {
    pub platform: String,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformYearSales {
    pub platform: String,
    pub year: u16,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreSales {
    pub genre: String,
    pub total_sales: f64,
}

/// Sales of one title on one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSales {
    pub name: String,
    pub platform: String,
    pub total_sales: f64,
}

/// Per-region sales of one platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionalSales {
    pub platform: String,
    pub na_sales: f64,
    pub eu_sales: f64,
    pub jp_sales: f64,
    pub other_sales: f64,
}

impl RegionalSales {
    fn new(platform: &str) -> Self {
        Self {
            platform: platform.to_string(),
            ..Self::default()
        }
    }

    fn add_record(&mut self, record: &SalesRecord) {
        self.na_sales += record.na_sales;
        self.eu_sales += record.eu_sales;
        self.jp_sales += record.jp_sales;
        self.other_sales += record.other_sales;
    }

    pub fn region(&self, region: Region) -> f64 {
        match region {
            Region::NorthAmerica => self.na_sales,
            Region::Europe => self.eu_sales,
            Region::Japan => self.jp_sales,
            Region::Other => self.other_sales,
        }
    }

    pub fn total(&self) -> f64 {
        self.na_sales + self.eu_sales + self.jp_sales + self.other_sales
    }
}

/// Sort direction for grouped sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups sales records.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Count titles per release year, ascending by year.
    ///
    /// Rows without a name are not counted.
    pub fn count_by_year<'a, I>(records: I) -> Vec<YearCount>
    where
        I: IntoIterator<Item = &'a SalesRecord>,
    {
        let mut map: BTreeMap<u16, u64> = BTreeMap::new();
        for record in records {
            let slot = map.entry(record.year_of_release).or_insert(0);
            if record.name.is_some() {
                *slot += 1;
            }
        }
        map.into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect()
    }

    /// Sum total sales per platform, sorted by sum in `order`.
    pub fn sum_sales_by_platform<'a, I>(records: I, order: SortOrder) -> Vec<PlatformSales>
    where
        I: IntoIterator<Item = &'a SalesRecord>,
    {
        let map = Self::sum_by(records, |r| Some(r.platform.clone()));
        let mut rows: Vec<PlatformSales> = map
            .into_iter()
            .map(|(platform, total_sales)| PlatformSales {
                platform,
                total_sales,
            })
            .collect();

        // Stable sort keeps ties in ascending key order.
        match order {
            SortOrder::Ascending => rows.sort_by(|a, b| a.total_sales.total_cmp(&b.total_sales)),
            SortOrder::Descending => rows.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales)),
        }
        rows
    }

    /// Sum total sales per `(platform, year)`, newest year first.
    pub fn sum_sales_by_platform_and_year<'a, I>(records: I) -> Vec<PlatformYearSales>
    where
        I: IntoIterator<Item = &'a SalesRecord>,
    {
        let map = Self::sum_by(records, |r| Some((r.year_of_release, r.platform.clone())));
        let mut rows: Vec<PlatformYearSales> = map
            .into_iter()
            .map(|((year, platform), total_sales)| PlatformYearSales {
                platform,
                year,
                total_sales,
            })
            .collect();
        rows.sort_by(|a, b| b.year.cmp(&a.year));
        rows
    }

    /// Sum total sales per genre, best seller first. Rows without a genre
    /// are left out.
    pub fn sum_sales_by_genre<'a, I>(records: I) -> Vec<GenreSales>
    where
        I: IntoIterator<Item = &'a SalesRecord>,
    {
        let map = Self::sum_by(records, |r| r.genre.clone());
        let mut rows: Vec<GenreSales> = map
            .into_iter()
            .map(|(genre, total_sales)| GenreSales { genre, total_sales })
            .collect();
        rows.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
        rows
    }

    /// Sum total sales per `(name, platform)`, best seller first. Rows
    /// without a name are left out.
    pub fn sum_sales_by_game_and_platform<'a, I>(records: I) -> Vec<GameSales>
    where
        I: IntoIterator<Item = &'a SalesRecord>,
    {
        let map = Self::sum_by(records, |r| {
            r.name.clone().map(|name| (name, r.platform.clone()))
        });
        let mut rows: Vec<GameSales> = map
            .into_iter()
            .map(|((name, platform), total_sales)| GameSales {
                name,
                platform,
                total_sales,
            })
            .collect();
        rows.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
        rows
    }

    /// Sum each regional column per platform, largest platform first.
    pub fn sum_regional_sales_by_platform<'a, I>(records: I) -> Vec<RegionalSales>
    where
        I: IntoIterator<Item = &'a SalesRecord>,
    {
        let mut map: BTreeMap<&str, RegionalSales> = BTreeMap::new();
        for record in records {
            map.entry(record.platform.as_str())
                .or_insert_with(|| RegionalSales::new(&record.platform))
                .add_record(record);
        }
        let mut rows: Vec<RegionalSales> = map.into_values().collect();
        rows.sort_by(|a, b| b.total().total_cmp(&a.total()));
        rows
    }

    /// Total sales over all `records`.
    pub fn grand_total<'a, I>(records: I) -> f64
    where
        I: IntoIterator<Item = &'a SalesRecord>,
    {
        records.into_iter().map(SalesRecord::total_sales).sum()
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Sum `total_sales` per key; records mapped to `None` are skipped.
    fn sum_by<'a, I, K, F>(records: I, key_fn: F) -> BTreeMap<K, f64>
    where
        I: IntoIterator<Item = &'a SalesRecord>,
        K: Ord,
        F: Fn(&SalesRecord) -> Option<K>,
    {
        let mut map: BTreeMap<K, f64> = BTreeMap::new();
        for record in records {
            if let Some(key) = key_fn(record) {
                *map.entry(key).or_insert(0.0) += record.total_sales();
            }
        }
        map
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
