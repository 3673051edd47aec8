//! Main analysis pipeline for the game sales data.
//!
//! Runs the sequence of views used to pick platforms and genres for the next
//! marketing campaign and returns a [`SalesReport`] ready for the UI layer.

use serde::Serialize;
use tracing::{debug, info};

use sales_core::error::Result;
use sales_core::models::{SalesRecord, SalesTable};
use sales_core::settings::Settings;

use crate::aggregator::{
    GameSales, GenreSales, PlatformSales, PlatformYearSales, RegionalSales, SalesAggregator,
    SortOrder, YearCount,
};
use crate::filters::{PlatformSet, YearRange};
use crate::stats::{describe, BoxStats, ColumnSummary};

// ── Public types ──────────────────────────────────────────────────────────────

/// Windows and platform choices for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisConfig {
    /// Broad window used to spot platform trends.
    pub analysis_years: YearRange,
    /// Narrow window for the focus subset.
    pub focus_years: YearRange,
    pub focus_platforms: PlatformSet,
    /// Rows kept in the top game/platform table.
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            analysis_years: YearRange { from: 2011, to: 2016 },
            focus_years: YearRange { from: 2014, to: 2016 },
            focus_platforms: sales_core::settings::DEFAULT_FOCUS_PLATFORMS
                .into_iter()
                .collect(),
            top_n: 15,
        }
    }
}

impl AnalysisConfig {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            analysis_years: YearRange::between(settings.from_year, settings.to_year)?,
            focus_years: YearRange::between(settings.focus_from, settings.focus_to)?,
            focus_platforms: settings.platforms.iter().cloned().collect(),
            top_n: settings.top,
        })
    }

    /// `true` for records in the focus window on a focus platform.
    pub fn in_focus(&self, record: &SalesRecord) -> bool {
        self.focus_years.matches(record) && self.focus_platforms.matches(record)
    }
}

/// Aggregates over the focus subset.
#[derive(Debug, Clone, Serialize)]
pub struct FocusReport {
    pub records: usize,
    pub platform_totals: Vec<PlatformSales>,
    /// One box per platform with data, in `platform_totals` order.
    pub platform_boxes: Vec<BoxStats>,
    pub top_games: Vec<GameSales>,
    pub genre_totals: Vec<GenreSales>,
    pub regional_totals: Vec<RegionalSales>,
}

/// The complete output of [`analyze_sales`].
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub config: AnalysisConfig,
    pub records: usize,
    pub grand_total: f64,
    pub summary: Vec<ColumnSummary>,
    /// Release counts for every year, ascending; year `0` is unknown.
    pub releases_by_year: Vec<YearCount>,
    pub platform_totals: Vec<PlatformSales>,
    pub window_records: usize,
    pub window_platform_totals: Vec<PlatformSales>,
    pub window_platform_years: Vec<PlatformYearSales>,
    pub focus: FocusReport,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis over a cleaned table.
///
/// 1. Describe the numeric columns and count releases per year.
/// 2. Rank platforms over all years.
/// 3. Rank platforms and platform-years inside the analysis window.
/// 4. Narrow to the focus window and platforms and build the focus views.
pub fn analyze_sales(table: &SalesTable, config: &AnalysisConfig) -> SalesReport {
    // ── Step 1: Overview ──────────────────────────────────────────────────────
    let summary = describe(table);
    let releases_by_year = SalesAggregator::count_by_year(table);
    let grand_total = SalesAggregator::grand_total(table);

    // ── Step 2: All-time platforms ────────────────────────────────────────────
    let platform_totals = SalesAggregator::sum_sales_by_platform(table, SortOrder::Descending);

    // ── Step 3: Analysis window ───────────────────────────────────────────────
    let window = table.filter(|r| config.analysis_years.matches(r));
    debug!(
        "{} records in analysis window {}",
        window.len(),
        config.analysis_years
    );
    let window_platform_totals =
        SalesAggregator::sum_sales_by_platform(window.iter().copied(), SortOrder::Descending);
    let window_platform_years =
        SalesAggregator::sum_sales_by_platform_and_year(window.iter().copied());

    // ── Step 4: Focus subset ──────────────────────────────────────────────────
    let focus = build_focus(table.filter(|r| config.in_focus(r)), config);

    info!(
        "Analysed {} records ({} in focus), {:.2}M units total",
        table.len(),
        focus.records,
        grand_total
    );

    SalesReport {
        config: config.clone(),
        records: table.len(),
        grand_total,
        summary,
        releases_by_year,
        platform_totals,
        window_records: window.len(),
        window_platform_totals,
        window_platform_years,
        focus,
    }
}

fn build_focus(records: Vec<&SalesRecord>, config: &AnalysisConfig) -> FocusReport {
    let platform_totals =
        SalesAggregator::sum_sales_by_platform(records.iter().copied(), SortOrder::Descending);

    let platform_boxes = platform_totals
        .iter()
        .filter_map(|p| {
            let values: Vec<f64> = records
                .iter()
                .filter(|r| r.platform == p.platform)
                .map(|r| r.total_sales())
                .collect();
            BoxStats::from_values(p.platform.clone(), &values)
        })
        .collect();

    let mut top_games = SalesAggregator::sum_sales_by_game_and_platform(records.iter().copied());
    top_games.truncate(config.top_n);

    FocusReport {
        records: records.len(),
        platform_totals,
        platform_boxes,
        top_games,
        genre_totals: SalesAggregator::sum_sales_by_genre(records.iter().copied()),
        regional_totals: SalesAggregator::sum_regional_sales_by_platform(records.iter().copied()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
