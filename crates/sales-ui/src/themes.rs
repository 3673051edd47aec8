use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .and_then(parse_colorfgbg)
        .unwrap_or(BackgroundType::Dark)
}

fn parse_colorfgbg(value: &str) -> Option<BackgroundType> {
    let bg = value.split(';').next_back()?.parse::<u8>().ok()?;
    Some(if bg <= 6 {
        BackgroundType::Dark
    } else {
        BackgroundType::Light
    })
}

/// Styles used by the sales charts, tables and viewer chrome.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Chrome ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub text: Style,
    pub dim: Style,
    pub border: Style,
    pub warning: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub bar: Style,
    pub bar_value: Style,
    pub axis: Style,
    pub box_median: Style,
    pub outlier: Style,
    /// Cycled per group in multi-series charts.
    pub series: Vec<Color>,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::DarkGray),
            warning: Style::default().fg(Color::Yellow),

            bar: Style::default().fg(Color::Cyan),
            bar_value: Style::default().fg(Color::Black).bg(Color::Cyan),
            axis: Style::default().fg(Color::Gray),
            box_median: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            outlier: Style::default().fg(Color::Red),
            series: vec![
                Color::Cyan,
                Color::Green,
                Color::Yellow,
                Color::Magenta,
                Color::Blue,
                Color::LightRed,
            ],

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text so content stays legible on a light canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            border: Style::default().fg(Color::Gray),
            warning: Style::default().fg(Color::Yellow),

            bar: Style::default().fg(Color::Blue),
            bar_value: Style::default().fg(Color::White).bg(Color::Blue),
            axis: Style::default().fg(Color::DarkGray),
            box_median: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            outlier: Style::default().fg(Color::Red),
            series: vec![
                Color::Blue,
                Color::Green,
                Color::Magenta,
                Color::Red,
                Color::DarkGray,
                Color::Cyan,
            ],

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Classic theme using only the basic ANSI palette and no bold text.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::DarkGray),
            warning: Style::default().fg(Color::Yellow),

            bar: Style::default().fg(Color::Green),
            bar_value: Style::default().fg(Color::Black).bg(Color::Green),
            axis: Style::default().fg(Color::White),
            box_median: Style::default().fg(Color::White),
            outlier: Style::default().fg(Color::Red),
            series: vec![Color::Green, Color::Cyan, Color::Yellow, Color::Magenta],

            table_header: Style::default().fg(Color::Cyan),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    /// Colour for the `index`-th series, cycling through the palette.
    pub fn series_color(&self, index: usize) -> Color {
        if self.series.is_empty() {
            return Color::Reset;
        }
        self.series[index % self.series.len()]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
