//! Report pages and the two ways of showing them.
//!
//! [`App`] owns the theme and the ordered report pages. [`App::print`] writes
//! every page as plain text; [`App::run_interactive`] opens a full-screen
//! viewer that pages through them.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    text::{Line, Span},
    Frame, Terminal,
};
use tracing::debug;

use sales_core::{Result, SalesError};
use sales_data::analysis::SalesReport;

use crate::charts::{Chart, ChartView, Plotter, TextPlotter, RELEASE_YEARS};
use crate::table_view::{self, TextTable};
use crate::themes::Theme;

// ── Page ──────────────────────────────────────────────────────────────────────

/// One screen of the report.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Chart(Chart),
    Table(TextTable),
}

impl Page {
    pub fn title(&self) -> &str {
        match self {
            Page::Chart(chart) => &chart.title,
            Page::Table(table) => &table.title,
        }
    }
}

/// The report pages in reading order: overview, all-time platforms, the
/// analysis window, then the focus subset.
pub fn report_pages(report: &SalesReport) -> Vec<Page> {
    let window = report.config.analysis_years;
    let focus_years = report.config.focus_years;
    let window_total: f64 = report
        .window_platform_totals
        .iter()
        .map(|p| p.total_sales)
        .sum();
    let focus_total: f64 = report
        .focus
        .platform_totals
        .iter()
        .map(|p| p.total_sales)
        .sum();

    vec![
        Page::Table(table_view::summary_table(&report.summary)),
        Page::Chart(Chart::releases_by_year(&report.releases_by_year, RELEASE_YEARS)),
        Page::Table(table_view::platform_table(
            "Platform sales, all years",
            &report.platform_totals,
            report.grand_total,
        )),
        Page::Table(table_view::platform_table(
            &format!("Platform sales, {window}"),
            &report.window_platform_totals,
            window_total,
        )),
        Page::Table(table_view::platform_year_table(
            &format!("Platform sales by year, {window}"),
            &report.window_platform_years,
        )),
        Page::Table(table_view::platform_table(
            &format!("Focus platform sales, {focus_years}"),
            &report.focus.platform_totals,
            focus_total,
        )),
        Page::Chart(Chart::platform_boxes(
            format!("Sales per title by platform, {focus_years}"),
            &report.focus.platform_boxes,
        )),
        Page::Table(table_view::top_games_table(
            &format!("Top {} games by platform, {focus_years}", report.config.top_n),
            &report.focus.top_games,
        )),
        Page::Table(table_view::genre_table(
            &format!("Genre sales, {focus_years}"),
            &report.focus.genre_totals,
        )),
        Page::Table(table_view::regional_table(
            &format!("Regional sales by platform, {focus_years}"),
            &report.focus.regional_totals,
        )),
    ]
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub theme: Theme,
    pub pages: Vec<Page>,
    /// Index of the page on screen.
    pub current: usize,
    /// Table rows scrolled past on the current page.
    pub scroll: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, pages: Vec<Page>) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            pages,
            current: 0,
            scroll: 0,
            should_quit: false,
        }
    }

    pub fn from_report(theme_name: &str, report: &SalesReport) -> Self {
        Self::new(theme_name, report_pages(report))
    }

    /// Write every page to `writer`: tables as aligned text, charts drawn at
    /// `width` x `height` cells.
    pub fn print<W: Write>(&self, writer: &mut W, width: u16, height: u16) -> Result<()> {
        for page in &self.pages {
            match page {
                Page::Table(table) => table.write_to(writer)?,
                Page::Chart(chart) => {
                    TextPlotter::new(&mut *writer, width, height, self.theme.clone())
                        .plot(chart)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Run the full-screen viewer until `q`, `Esc` or `Ctrl+C`.
    ///
    /// Left/Right switch pages, Up/Down scroll long tables.
    pub fn run_interactive(mut self) -> Result<()> {
        let mut terminal =
            Terminal::new(CrosstermBackend::new(io::stdout())).map_err(terminal_error)?;

        enable_raw_mode().map_err(terminal_error)?;
        let result = execute!(terminal.backend_mut(), EnterAlternateScreen)
            .map_err(terminal_error)
            .and_then(|()| self.event_loop(&mut terminal));

        // Restore terminal state unconditionally.
        let restored = restore_terminal(terminal.backend_mut());
        result.and(restored)
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let tick_rate = Duration::from_millis(250);

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Apply one key press to the viewer state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Right | KeyCode::Tab | KeyCode::PageDown => self.next_page(),
            KeyCode::Left | KeyCode::BackTab | KeyCode::PageUp => self.previous_page(),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
    }

    pub fn next_page(&mut self) {
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            self.scroll = 0;
            debug!("Viewer page {}", self.current + 1);
        }
    }

    pub fn previous_page(&mut self) {
        if self.current > 0 {
            self.current -= 1;
            self.scroll = 0;
            debug!("Viewer page {}", self.current + 1);
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let rows = match self.pages.get(self.current) {
            Some(Page::Table(table)) => table.rows.len(),
            _ => 0,
        };
        self.scroll = self
            .scroll
            .saturating_add_signed(delta)
            .min(rows.saturating_sub(1));
    }

    /// Render the current page with a title bar and key help.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

        let Some(page) = self.pages.get(self.current) else {
            frame.render_widget(
                Line::from(Span::styled("No report pages", self.theme.warning)),
                chunks[1],
            );
            return;
        };

        frame.render_widget(
            Line::from(vec![
                Span::styled("Game sales", self.theme.header),
                Span::styled(
                    format!("  {}/{}  ", self.current + 1, self.pages.len()),
                    self.theme.dim,
                ),
                Span::styled(page.title().to_string(), self.theme.text),
            ]),
            chunks[0],
        );

        match page {
            Page::Chart(chart) => frame.render_widget(ChartView::new(chart, &self.theme), chunks[1]),
            Page::Table(table) => {
                table_view::render_table_view(frame, chunks[1], table, self.scroll, &self.theme)
            }
        }

        frame.render_widget(
            Line::from(Span::styled(
                "←/→ page  ↑/↓ scroll  q quit",
                self.theme.dim,
            )),
            chunks[2],
        );
    }
}

/// Leave raw mode and the alternate screen. Every step runs even when an
/// earlier one fails; the first failure is returned.
fn restore_terminal<W: Write>(backend: &mut CrosstermBackend<W>) -> Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(backend, LeaveAlternateScreen);
    let cursor = backend.show_cursor();
    raw.and(screen).and(cursor).map_err(terminal_error)
}

fn terminal_error(err: io::Error) -> SalesError {
    SalesError::Terminal(err.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
