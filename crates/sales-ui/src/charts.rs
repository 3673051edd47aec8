//! Chart descriptions and the plotters that draw them.
//!
//! A [`Chart`] is plain data: title, axis labels, x values and the y data for
//! the chart kind. A [`Plotter`] turns it into output. [`TextPlotter`] draws
//! into an off-screen ratatui [`Buffer`] and writes the cells as plain text,
//! and the interactive viewer renders the same [`ChartView`] into a live
//! terminal frame.

use std::io::Write;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Widget};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use tracing::debug;

use sales_core::error::Result;
use sales_data::aggregator::YearCount;
use sales_data::filters::YearRange;
use sales_data::stats::BoxStats;

use crate::components::bar_chart::HorizontalBarChart;
use crate::components::box_plot::BoxPlot;
use crate::themes::Theme;

/// Border and caption rows around the plot area.
const CHART_CHROME_ROWS: u16 = 3;

/// Years shown on the release histogram.
pub const RELEASE_YEARS: YearRange = YearRange { from: 1980, to: 2016 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    BoxPlot,
}

/// The y side of a chart, one entry per x value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ChartData {
    Bars(Vec<f64>),
    Boxes(Vec<BoxStats>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_values: Vec<String>,
    pub data: ChartData,
    /// Decimals used for value text.
    pub decimals: usize,
}

impl Chart {
    pub fn bar(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        points: Vec<(String, f64)>,
    ) -> Self {
        let (x_values, y_values) = points.into_iter().unzip();
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            x_values,
            data: ChartData::Bars(y_values),
            decimals: 0,
        }
    }

    /// Release counts per year over `years`, oldest first.
    ///
    /// Years outside the range (including the unknown year `0`) are dropped,
    /// and years inside it without releases get an empty bar.
    pub fn releases_by_year(counts: &[YearCount], years: YearRange) -> Self {
        let points = years
            .years()
            .map(|year| {
                let count = counts
                    .iter()
                    .find(|c| c.year == year)
                    .map_or(0, |c| c.count);
                (year.to_string(), count as f64)
            })
            .collect();
        Self::bar("Games released per year", "year", "count", points)
    }

    /// Distribution of per-title total sales for each platform.
    pub fn platform_boxes(title: impl Into<String>, boxes: &[BoxStats]) -> Self {
        Self {
            title: title.into(),
            x_label: "platform".to_string(),
            y_label: "total_sales".to_string(),
            x_values: boxes.iter().map(|b| b.label.clone()).collect(),
            data: ChartData::Boxes(boxes.to_vec()),
            decimals: 2,
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self.data {
            ChartData::Bars(_) => ChartKind::Bar,
            ChartData::Boxes(_) => ChartKind::BoxPlot,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }

    fn axis_caption(&self) -> String {
        match self.kind() {
            ChartKind::Bar => format!("{} (rows) vs {}", self.x_label, self.y_label),
            ChartKind::BoxPlot => format!("{} (rows) vs {} (scale)", self.x_label, self.y_label),
        }
    }
}

// ── Widget ────────────────────────────────────────────────────────────────────

/// Bordered chart with its title, an axis caption line and the plot.
pub struct ChartView<'a> {
    pub chart: &'a Chart,
    pub theme: &'a Theme,
}

impl<'a> ChartView<'a> {
    pub fn new(chart: &'a Chart, theme: &'a Theme) -> Self {
        Self { chart, theme }
    }
}

impl Widget for ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border)
            .title(Span::styled(
                format!(" {} ", self.chart.title),
                self.theme.header,
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 {
            return;
        }

        Line::from(Span::styled(self.chart.axis_caption(), self.theme.dim)).render(
            Rect::new(inner.x, inner.y, inner.width, 1),
            buf,
        );
        let plot = Rect::new(inner.x, inner.y + 1, inner.width, inner.height - 1);

        if self.chart.is_empty() {
            Line::from(Span::styled("No data", self.theme.warning)).render(plot, buf);
            return;
        }

        match &self.chart.data {
            ChartData::Bars(values) => {
                HorizontalBarChart::new(&self.chart.x_values, values, self.theme)
                    .decimals(self.chart.decimals)
                    .render(plot, buf);
            }
            ChartData::Boxes(boxes) => {
                let mut widget = BoxPlot::new(boxes, self.theme);
                widget.decimals = self.chart.decimals;
                widget.render(plot, buf);
            }
        }
    }
}

// ── Plotters ──────────────────────────────────────────────────────────────────

/// Something that can draw a [`Chart`].
pub trait Plotter {
    fn plot(&mut self, chart: &Chart) -> Result<()>;
}

/// Draws charts as plain text on any writer.
pub struct TextPlotter<W: Write> {
    writer: W,
    width: u16,
    height: u16,
    theme: Theme,
}

impl<W: Write> TextPlotter<W> {
    pub fn new(writer: W, width: u16, height: u16, theme: Theme) -> Self {
        Self {
            writer,
            width,
            height,
            theme,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Rows needed for `chart`: borders and caption plus the plot rows.
    ///
    /// Bar charts always get one row per bar. Box plots get the configured
    /// height, grown to one row per box plus the scale when that is more.
    fn rows_for(&self, chart: &Chart) -> u16 {
        let plot_rows = match &chart.data {
            ChartData::Bars(values) => values.len().max(1),
            ChartData::Boxes(boxes) => boxes.len() + 1,
        };
        let needed = u16::try_from(plot_rows)
            .unwrap_or(u16::MAX)
            .saturating_add(CHART_CHROME_ROWS);
        match chart.kind() {
            ChartKind::Bar => needed,
            ChartKind::BoxPlot => {
                if needed > self.height {
                    debug!(
                        "Growing \"{}\" from {} to {} rows to fit every group",
                        chart.title, self.height, needed
                    );
                }
                needed.max(self.height)
            }
        }
    }
}

impl<W: Write> Plotter for TextPlotter<W> {
    fn plot(&mut self, chart: &Chart) -> Result<()> {
        let area = Rect::new(0, 0, self.width, self.rows_for(chart));
        let mut buf = Buffer::empty(area);
        ChartView::new(chart, &self.theme).render(area, &mut buf);

        for line in buffer_lines(&buf) {
            writeln!(self.writer, "{line}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Text of each buffer row with trailing blanks removed. Blank rows inside
/// the border are kept; blank rows at the very end are not.
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    let mut lines: Vec<String> = (area.top()..area.bottom())
        .map(|y| {
            let mut line = String::new();
            let mut skip = 0usize;
            for x in area.left()..area.right() {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                let symbol = buf[(x, y)].symbol();
                line.push_str(symbol);
                skip = symbol.width().saturating_sub(1);
            }
            line.trim_end().to_string()
        })
        .collect();

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}
