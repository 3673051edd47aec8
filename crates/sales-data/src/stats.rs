//! Descriptive statistics over numeric columns.
//!
//! [`describe`] mirrors the usual count / mean / std / quartiles summary of a
//! dataframe, and [`BoxStats`] computes Tukey box-and-whisker bounds for the
//! boxplot.

use serde::Serialize;

use sales_core::models::SalesRecord;

/// Summary of one numeric column. Statistics are `None` when the column has
/// too few values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: &'static str,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    /// Summarize `values`; NaNs are ignored.
    pub fn from_values(column: &'static str, values: &[f64]) -> Self {
        let sorted = sorted_finite(values);
        let count = sorted.len();

        let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|m| {
            let var = sorted.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        });

        Self {
            column,
            count,
            mean,
            std,
            min: sorted.first().copied(),
            q25: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.50),
            q75: percentile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Summaries for every numeric column, in schema order, with `total_sales`
/// last. Unknown years and critic scores are `0` and are counted as such;
/// null user scores are skipped.
pub fn describe<'a, I>(records: I) -> Vec<ColumnSummary>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let records: Vec<&SalesRecord> = records.into_iter().collect();
    let column = |name: &'static str, f: fn(&SalesRecord) -> Option<f64>| {
        let values: Vec<f64> = records.iter().filter_map(|r| f(r)).collect();
        ColumnSummary::from_values(name, &values)
    };

    vec![
        column("year_of_release", |r| Some(f64::from(r.year_of_release))),
        column("na_sales", |r| Some(r.na_sales)),
        column("eu_sales", |r| Some(r.eu_sales)),
        column("jp_sales", |r| Some(r.jp_sales)),
        column("other_sales", |r| Some(r.other_sales)),
        column("critic_score", |r| Some(f64::from(r.critic_score))),
        column("user_score", |r| r.user_score),
        column("total_sales", |r| Some(r.total_sales())),
    ]
}

// ── BoxStats ──────────────────────────────────────────────────────────────────

/// Box-and-whisker bounds for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub label: String,
    pub count: usize,
    /// Lowest value inside the lower fence.
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Highest value inside the upper fence.
    pub upper_whisker: f64,
    /// Values beyond 1.5 × IQR from the box, ascending.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Compute Tukey box statistics; `None` for an empty group.
    pub fn from_values(label: impl Into<String>, values: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(values);
        let (first, last) = (*sorted.first()?, *sorted.last()?);

        let q1 = percentile(&sorted, 0.25)?;
        let median = percentile(&sorted, 0.50)?;
        let q3 = percentile(&sorted, 0.75)?;

        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&x| x >= lower_fence)
            .unwrap_or(first);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&x| x <= upper_fence)
            .unwrap_or(last);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|&x| x < lower_fence || x > upper_fence)
            .collect();

        Some(Self {
            label: label.into(),
            count: sorted.len(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Largest value in the group, outliers included.
    pub fn max_value(&self) -> f64 {
        self.outliers
            .last()
            .copied()
            .map_or(self.upper_whisker, |o| o.max(self.upper_whisker))
    }

    /// Smallest value in the group, outliers included.
    pub fn min_value(&self) -> f64 {
        self.outliers
            .first()
            .copied()
            .map_or(self.lower_whisker, |o| o.min(self.lower_whisker))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile `p` (0..=1) of sorted data using linear interpolation.
fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let index = p * (n - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    let frac = index - lower as f64;

    if lower == upper || upper >= n {
        Some(sorted[lower.min(n - 1)])
    } else {
        Some(sorted[lower] * (1.0 - frac) + sorted[upper] * frac)
    }
}
