//! Printed tables for the sales report.
//!
//! A [`TextTable`] is rendered two ways: as aligned plain text for console
//! output, and as a bordered [`ratatui::widgets::Table`] in the interactive
//! viewer. Column widths are measured in display cells so titles with wide
//! characters still line up.

use std::io::Write;

use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use sales_core::formatting::{format_count, format_optional, format_sales, format_share};
use sales_core::models::Region;
use sales_core::Result;
use sales_data::aggregator::{GameSales, GenreSales, PlatformSales, PlatformYearSales, RegionalSales};
use sales_data::cleaner::MissingValueSummary;
use sales_data::stats::ColumnSummary;

use crate::themes::Theme;

const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A titled table of pre-formatted cells with an optional totals row.
#[derive(Debug, Clone, PartialEq)]
pub struct TextTable {
    pub title: String,
    pub headers: Vec<String>,
    pub align: Vec<Align>,
    pub rows: Vec<Vec<String>>,
    pub total: Option<Vec<String>>,
}

impl TextTable {
    pub fn new(title: impl Into<String>, columns: &[(&str, Align)]) -> Self {
        Self {
            title: title.into(),
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            align: columns.iter().map(|(_, a)| *a).collect(),
            rows: Vec::new(),
            total: None,
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn with_total(mut self, cells: Vec<String>) -> Self {
        self.total = Some(cells);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display width of each column: the widest of header and cells.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in self.rows.iter().chain(self.total.iter()) {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.width());
                }
            }
        }
        widths
    }

    /// Aligned plain-text rendering, one line per row, without trailing
    /// whitespace.
    pub fn render_text(&self) -> String {
        let widths = self.column_widths();
        let mut out = String::new();

        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&self.format_line(&self.headers, &widths));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join(COLUMN_GAP));
        out.push('\n');

        if self.rows.is_empty() {
            out.push_str("(no rows)\n");
        }
        for row in &self.rows {
            out.push_str(&self.format_line(row, &widths));
            out.push('\n');
        }
        if let Some(total) = &self.total {
            out.push_str(&rule.join(COLUMN_GAP));
            out.push('\n');
            out.push_str(&self.format_line(total, &widths));
            out.push('\n');
        }
        out
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.render_text())?;
        Ok(())
    }

    fn format_line(&self, cells: &[String], widths: &[usize]) -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let fill = " ".repeat(width.saturating_sub(cell.width()));
                match self.align.get(i).copied().unwrap_or(Align::Left) {
                    Align::Left => format!("{cell}{fill}"),
                    Align::Right => format!("{fill}{cell}"),
                }
            })
            .collect();
        padded.join(COLUMN_GAP).trim_end().to_string()
    }
}

// ── Report tables ─────────────────────────────────────────────────────────────

/// Count, mean, std and quartiles for each numeric column.
pub fn summary_table(summaries: &[ColumnSummary]) -> TextTable {
    let mut columns = vec![("column", Align::Left)];
    columns.extend(
        ["count", "mean", "std", "min", "25%", "50%", "75%", "max"]
            .iter()
            .map(|h| (*h, Align::Right)),
    );
    let mut table = TextTable::new("Numeric columns", &columns);

    for s in summaries {
        table.push_row(vec![
            s.column.to_string(),
            format_count(s.count as u64),
            format_optional(s.mean, 2),
            format_optional(s.std, 2),
            format_optional(s.min, 2),
            format_optional(s.q25, 2),
            format_optional(s.median, 2),
            format_optional(s.q75, 2),
            format_optional(s.max, 2),
        ]);
    }
    table
}

/// Null cells per column of the raw table, followed by a row for the
/// `user_score` "tbd" sentinel. Sentinels are not nulls, so the table has no
/// totals row.
pub fn missing_values_table(summary: &MissingValueSummary) -> TextTable {
    let mut table = TextTable::new(
        format!("Missing values ({} rows)", format_count(summary.total_rows as u64)),
        &[
            ("column", Align::Left),
            ("missing", Align::Right),
            ("share", Align::Right),
        ],
    );
    let total = summary.total_rows as f64;

    for (column, count) in &summary.missing {
        table.push_row(vec![
            column.name().to_string(),
            format_count(*count as u64),
            format_share(*count as f64, total),
        ]);
    }
    table.push_row(vec![
        "user_score \"tbd\"".to_string(),
        format_count(summary.user_score_sentinels as u64),
        format_share(summary.user_score_sentinels as f64, total),
    ]);
    table
}

/// Platforms ranked by sales, with each platform's share of `grand_total`.
pub fn platform_table(title: &str, platforms: &[PlatformSales], grand_total: f64) -> TextTable {
    let mut table = TextTable::new(
        title,
        &[
            ("platform", Align::Left),
            ("total_sales", Align::Right),
            ("share", Align::Right),
        ],
    );
    for p in platforms {
        table.push_row(vec![
            p.platform.clone(),
            format_sales(p.total_sales),
            format_share(p.total_sales, grand_total),
        ]);
    }
    let sum: f64 = platforms.iter().map(|p| p.total_sales).sum();
    table.with_total(vec![
        "TOTAL".to_string(),
        format_sales(sum),
        format_share(sum, grand_total),
    ])
}

pub fn platform_year_table(title: &str, rows: &[PlatformYearSales]) -> TextTable {
    let mut table = TextTable::new(
        title,
        &[
            ("year", Align::Right),
            ("platform", Align::Left),
            ("total_sales", Align::Right),
        ],
    );
    for r in rows {
        table.push_row(vec![
            r.year.to_string(),
            r.platform.clone(),
            format_sales(r.total_sales),
        ]);
    }
    table
}

pub fn top_games_table(title: &str, games: &[GameSales]) -> TextTable {
    let mut table = TextTable::new(
        title,
        &[
            ("#", Align::Right),
            ("name", Align::Left),
            ("platform", Align::Left),
            ("total_sales", Align::Right),
        ],
    );
    for (rank, g) in games.iter().enumerate() {
        table.push_row(vec![
            (rank + 1).to_string(),
            g.name.clone(),
            g.platform.clone(),
            format_sales(g.total_sales),
        ]);
    }
    table
}

pub fn genre_table(title: &str, genres: &[GenreSales]) -> TextTable {
    let total: f64 = genres.iter().map(|g| g.total_sales).sum();
    let mut table = TextTable::new(
        title,
        &[
            ("genre", Align::Left),
            ("total_sales", Align::Right),
            ("share", Align::Right),
        ],
    );
    for g in genres {
        table.push_row(vec![
            g.genre.clone(),
            format_sales(g.total_sales),
            format_share(g.total_sales, total),
        ]);
    }
    table
}

/// Per-region sales for each platform plus a totals row.
pub fn regional_table(title: &str, rows: &[RegionalSales]) -> TextTable {
    let mut columns = vec![("platform", Align::Left)];
    columns.extend(Region::ALL.iter().map(|r| (r.label(), Align::Right)));
    columns.push(("total", Align::Right));
    let mut table = TextTable::new(title, &columns);

    for r in rows {
        let mut cells = vec![r.platform.clone()];
        cells.extend(Region::ALL.iter().map(|region| format_sales(r.region(*region))));
        cells.push(format_sales(r.total()));
        table.push_row(cells);
    }

    let mut total = vec!["TOTAL".to_string()];
    total.extend(
        Region::ALL
            .iter()
            .map(|region| format_sales(rows.iter().map(|r| r.region(*region)).sum())),
    );
    total.push(format_sales(rows.iter().map(RegionalSales::total).sum()));
    table.with_total(total)
}

// ── Interactive rendering ─────────────────────────────────────────────────────

/// Render `table` into `area`, skipping the first `scroll` data rows.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    table: &TextTable,
    scroll: usize,
    theme: &Theme,
) {
    let header = Row::new(
        table
            .headers
            .iter()
            .map(|h| Cell::from(h.as_str()).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .skip(scroll)
        .map(|(i, cells)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(aligned_cells(table, cells)).style(style)
        })
        .collect();

    if let Some(total) = &table.total {
        rows.push(Row::new(aligned_cells(table, total)).style(theme.table_total));
    }

    let widths: Vec<Constraint> = table
        .column_widths()
        .into_iter()
        .map(|w| Constraint::Length(u16::try_from(w).unwrap_or(u16::MAX)))
        .collect();

    let widget = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(format!(" {} ", table.title)),
        )
        .style(theme.text);

    frame.render_widget(widget, area);
}

fn aligned_cells<'a>(table: &TextTable, cells: &'a [String]) -> Vec<Cell<'a>> {
    let widths = table.column_widths();
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| match table.align.get(i) {
            Some(Align::Right) => {
                let width = widths.get(i).copied().unwrap_or(0);
                Cell::from(format!("{cell:>width$}", width = width.max(cell.width())))
            }
            _ => Cell::from(cell.as_str()),
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use sales_core::models::Column;

    fn platforms() -> Vec<PlatformSales> {
        vec![
            PlatformSales {
                platform: "PS4".to_string(),
                total_sales: 300.0,
            },
            PlatformSales {
                platform: "XOne".to_string(),
                total_sales: 100.0,
            },
        ]
    }

    #[test]
    fn test_render_text_aligns_columns() {
        let text = platform_table("Platforms", &platforms(), 400.0).render_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Platforms");
        assert_eq!(lines[1], "platform  total_sales   share");
        assert_eq!(lines[2], "--------  -----------  ------");
        assert_eq!(lines[3], "PS4            300.00   75.0%");
        assert_eq!(lines[4], "XOne           100.00   25.0%");
        assert_eq!(lines[6], "TOTAL          400.00  100.0%");
    }

    #[test]
    fn test_render_text_uses_display_width() {
        let mut table = TextTable::new("Games", &[("name", Align::Left), ("n", Align::Right)]);
        table.push_row(vec!["ポケモン".to_string(), "1".to_string()]);
        table.push_row(vec!["Tetris".to_string(), "22".to_string()]);
        let text = table.render_text();
        let lines: Vec<&str> = text.lines().collect();

        // "ポケモン" is four characters but eight cells wide.
        assert_eq!(table.column_widths(), vec![8, 2]);
        assert_eq!(lines[3], "ポケモン   1");
        assert_eq!(lines[4], "Tetris    22");
    }

    #[test]
    fn test_empty_table_says_no_rows() {
        let table = top_games_table("Top games", &[]);
        assert!(table.is_empty());
        assert!(table.render_text().contains("(no rows)"));
    }

    #[test]
    fn test_regional_table_totals() {
        let rows = vec![
            RegionalSales {
                platform: "PS4".to_string(),
                na_sales: 1.0,
                eu_sales: 2.0,
                jp_sales: 0.5,
                other_sales: 0.5,
            },
            RegionalSales {
                platform: "3DS".to_string(),
                na_sales: 1.0,
                eu_sales: 1.0,
                jp_sales: 3.0,
                other_sales: 0.0,
            },
        ];
        let table = regional_table("Regions", &rows);
        assert_eq!(table.headers, vec!["platform", "NA", "EU", "JP", "Other", "total"]);
        assert_eq!(
            table.total,
            Some(vec![
                "TOTAL".to_string(),
                "2.00".to_string(),
                "3.00".to_string(),
                "3.50".to_string(),
                "0.50".to_string(),
                "9.00".to_string(),
            ])
        );
    }

    #[test]
    fn test_missing_values_table() {
        let summary = MissingValueSummary {
            total_rows: 4,
            missing: vec![(Column::Name, 1), (Column::UserScore, 2)],
            user_score_sentinels: 1,
        };
        let table = missing_values_table(&summary);
        assert_eq!(table.title, "Missing values (4 rows)");
        assert_eq!(table.rows[0], vec!["name", "1", "25.0%"]);
        assert_eq!(table.rows[1], vec!["user_score", "2", "50.0%"]);
        assert_eq!(table.rows[2], vec!["user_score \"tbd\"", "1", "25.0%"]);
        assert_eq!(table.total, None);

        let text = table.render_text();
        let rules = text.lines().filter(|l| l.starts_with("---")).count();
        assert_eq!(rules, 1);
    }

    #[test]
    fn test_summary_table_formats_missing_stats() {
        let summaries = vec![ColumnSummary::from_values("user_score", &[])];
        let table = summary_table(&summaries);
        assert_eq!(table.headers.len(), 9);
        assert_eq!(table.rows[0][0], "user_score");
        assert_eq!(table.rows[0][1], "0");
        assert_eq!(table.rows[0][2], "-");
    }

    #[test]
    fn test_top_games_ranked() {
        let games = vec![GameSales {
            name: "Grand Theft Auto V".to_string(),
            platform: "PS4".to_string(),
            total_sales: 12.62,
        }];
        let table = top_games_table("Top", &games);
        assert_eq!(table.rows[0], vec!["1", "Grand Theft Auto V", "PS4", "12.62"]);
    }

    // ── Render (does not panic) ───────────────────────────────────────────────

    #[test]
    fn test_render_table_view_does_not_panic() {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let table = platform_table("Platforms", &platforms(), 400.0);

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, &table, 0, &theme);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let first_row: String = (0..80).map(|x| buffer[(x, 2)].symbol().to_string()).collect();
        assert!(first_row.contains("PS4"));
    }

    #[test]
    fn test_render_table_view_scrolled_past_end_does_not_panic() {
        let backend = TestBackend::new(60, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();
        let table = platform_table("Platforms", &platforms(), 400.0);

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, &table, 10, &theme);
            })
            .unwrap();
    }
}
