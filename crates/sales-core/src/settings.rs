use clap::Parser;
use std::path::PathBuf;

use crate::error::{Result, SalesError};

/// Platforms the focus analysis narrows to when none are given.
pub const DEFAULT_FOCUS_PLATFORMS: [&str; 6] = ["PS4", "XOne", "3DS", "PS3", "X360", "PC"];

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Exploratory analysis of historical video game sales
#[derive(Parser, Debug, Clone)]
#[command(
    name = "game-sales",
    about = "Exploratory analysis of historical video game sales",
    version
)]
pub struct Settings {
    /// CSV file of game sales records
    #[arg(default_value = "/datasets/games.csv")]
    pub input: PathBuf,

    /// First year of the analysis window
    #[arg(long, default_value = "2011")]
    pub from_year: u16,

    /// Last year of the analysis window (inclusive)
    #[arg(long, default_value = "2016")]
    pub to_year: u16,

    /// First year of the focus window
    #[arg(long, default_value = "2014")]
    pub focus_from: u16,

    /// Last year of the focus window (inclusive)
    #[arg(long, default_value = "2016")]
    pub focus_to: u16,

    /// Focus platforms, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        default_values = DEFAULT_FOCUS_PLATFORMS
    )]
    pub platforms: Vec<String>,

    /// Number of game/platform rows in the top sellers table
    #[arg(long, default_value = "15")]
    pub top: usize,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Open the full-screen chart viewer instead of printing
    #[arg(long)]
    pub interactive: bool,

    /// Display theme for the interactive viewer
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Width of text charts in columns
    #[arg(long, default_value = "80", value_parser = clap::value_parser!(u16).range(20..=400))]
    pub chart_width: u16,

    /// Height of text charts in rows
    #[arg(long, default_value = "40", value_parser = clap::value_parser!(u16).range(8..=400))]
    pub chart_height: u16,

    /// Print the per-column count of missing values
    #[arg(long)]
    pub missing_summary: bool,

    /// Write the cleaned table as CSV to this path
    #[arg(long)]
    pub export_cleaned: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse process arguments and apply derived values.
    pub fn load() -> Result<Self> {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but from an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let settings =
            Settings::try_parse_from(args).map_err(|e| SalesError::Config(e.to_string()))?;
        Self::resolve(settings)
    }

    /// Apply `--debug`, normalize platform names and check cross-field rules.
    fn resolve(mut settings: Settings) -> Result<Settings> {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings.platforms = settings
            .platforms
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        settings.validate()?;
        Ok(settings)
    }

    /// Check rules clap cannot express on a single argument.
    pub fn validate(&self) -> Result<()> {
        if self.from_year > self.to_year {
            return Err(SalesError::Config(format!(
                "analysis window starts after it ends ({} > {})",
                self.from_year, self.to_year
            )));
        }
        if self.focus_from > self.focus_to {
            return Err(SalesError::Config(format!(
                "focus window starts after it ends ({} > {})",
                self.focus_from, self.focus_to
            )));
        }
        if self.top == 0 {
            return Err(SalesError::Config("--top must be at least 1".to_string()));
        }
        if self.platforms.is_empty() {
            return Err(SalesError::Config(
                "--platforms needs at least one platform".to_string(),
            ));
        }
        Ok(())
    }

    /// `true` when the report should be emitted as JSON.
    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
